//! Gemeinsame Mocks für die Host-Tests
#![allow(dead_code)]

use embedded_storage::{ReadStorage, Storage};
use lamp_core::{
    Address, Bearers, HardwareOutput, HwError, LightState, MeshStack, MeshTransport,
    MessageContext, NodeConfig, OnOffStatus, OutputChannel, ProvisioningParams, StackError,
    StateStore, StoreError, TransportError,
};

// ============================================================================
// Mock Hardware
// ============================================================================

#[derive(Default)]
pub struct MockHardware {
    pub levels: [Option<LightState>; 2],
    pub writes: Vec<(OutputChannel, LightState)>,
    pub configured: Vec<OutputChannel>,
    pub fail_writes: bool,
    pub fail_next_write: bool,
    pub fail_reads: bool,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, channel: OutputChannel, state: LightState) -> Self {
        self.levels[channel.index()] = Some(state);
        self
    }

    pub fn level(&self, channel: OutputChannel) -> Option<LightState> {
        self.levels[channel.index()]
    }

    pub fn writes_to(&self, channel: OutputChannel) -> usize {
        self.writes.iter().filter(|(ch, _)| *ch == channel).count()
    }
}

impl HardwareOutput for MockHardware {
    fn configure(&mut self, channel: OutputChannel) -> Result<(), HwError> {
        self.configured.push(channel);
        self.levels[channel.index()] = Some(LightState::Off);
        Ok(())
    }

    fn write(&mut self, channel: OutputChannel, state: LightState) -> Result<(), HwError> {
        if self.fail_writes {
            return Err(HwError::WriteFailed(channel));
        }
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(HwError::WriteFailed(channel));
        }
        self.levels[channel.index()] = Some(state);
        self.writes.push((channel, state));
        Ok(())
    }

    fn read(&mut self, channel: OutputChannel) -> Result<LightState, HwError> {
        if self.fail_reads {
            return Err(HwError::ReadFailed(channel));
        }
        self.levels[channel.index()].ok_or(HwError::ReadFailed(channel))
    }
}

// ============================================================================
// Mock Transport
// ============================================================================

#[derive(Default)]
pub struct MockTransport {
    pub replies: Vec<(Address, u8)>,
    pub publishes: Vec<(Address, u8)>,
    pub fail_replies: bool,
    pub fail_publishes: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshTransport for MockTransport {
    fn send_reply(&mut self, ctx: &MessageContext, status: OnOffStatus) -> Result<(), TransportError> {
        if self.fail_replies {
            return Err(TransportError::QueueFull);
        }
        self.replies.push((ctx.src, status.payload()));
        Ok(())
    }

    fn publish(&mut self, destination: Address, status: OnOffStatus) -> Result<(), TransportError> {
        if self.fail_publishes {
            return Err(TransportError::QueueFull);
        }
        self.publishes.push((destination, status.payload()));
        Ok(())
    }
}

// ============================================================================
// Mock Store
// ============================================================================

#[derive(Default)]
pub struct MockStore {
    pub saved: Option<LightState>,
    pub save_count: usize,
    pub fail_saves: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_saved(state: LightState) -> Self {
        Self {
            saved: Some(state),
            ..Self::default()
        }
    }
}

impl StateStore for MockStore {
    fn load_state(&mut self) -> Option<LightState> {
        self.saved
    }

    fn save_state(&mut self, state: LightState) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::WriteFailed);
        }
        self.saved = Some(state);
        self.save_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Flash
// ============================================================================

/// RAM-Flash, gelöscht (0xFF) wie ein frischer Chip
pub struct MockFlash {
    pub memory: Vec<u8>,
    pub writes: usize,
    pub fail_writes: bool,
}

#[derive(Debug)]
pub struct MockFlashError;

impl MockFlash {
    pub fn erased(size: usize) -> Self {
        Self {
            memory: vec![0xFF; size],
            writes: 0,
            fail_writes: false,
        }
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, MockFlashError> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(MockFlashError)?;
        if end > self.memory.len() {
            return Err(MockFlashError);
        }
        Ok(start..end)
    }
}

impl ReadStorage for MockFlash {
    type Error = MockFlashError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.memory[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.memory.len()
    }
}

impl Storage for MockFlash {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockFlashError);
        }
        let range = self.range(offset, bytes.len())?;
        self.memory[range].copy_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Mesh Stack
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackCall {
    Enable,
    Init,
    LoadSettings,
    EnableProvisioning(Bearers),
}

#[derive(Default)]
pub struct MockStack {
    pub calls: Vec<StackCall>,
    pub provisioned: bool,
    pub provisioned_after_load: bool,
    pub fail_init: Option<StackError>,
    pub fail_load: Option<StackError>,
    pub last_node: Option<NodeConfig>,
}

impl MockStack {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MeshStack for MockStack {
    fn enable(&mut self) -> Result<(), StackError> {
        self.calls.push(StackCall::Enable);
        Ok(())
    }

    fn init(&mut self, node: &NodeConfig, _provisioning: &ProvisioningParams) -> Result<(), StackError> {
        self.calls.push(StackCall::Init);
        self.last_node = Some(*node);
        match self.fail_init {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn load_settings(&mut self) -> Result<(), StackError> {
        self.calls.push(StackCall::LoadSettings);
        if let Some(e) = self.fail_load {
            return Err(e);
        }
        if self.provisioned_after_load {
            self.provisioned = true;
        }
        Ok(())
    }

    fn is_provisioned(&self) -> bool {
        self.provisioned
    }

    fn enable_provisioning(&mut self, bearers: Bearers) -> Result<(), StackError> {
        self.calls.push(StackCall::EnableProvisioning(bearers));
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub const CLIENT: Address = Address::new(0x0002);
pub const OTHER_CLIENT: Address = Address::new(0x0003);
pub const NODE: Address = Address::new(0x0010);
pub const GROUP: Address = Address::new(0xC000);

pub fn ctx_from(src: Address) -> MessageContext {
    MessageContext::new(src, NODE)
}

/// Core-Logs in der Testausgabe (RUST_LOG=debug cargo test)
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .try_init();
}
