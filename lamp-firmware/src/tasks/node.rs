// Mesh Node Task - Lebenszyklus und Generic OnOff Server
use defmt::{info, warn};

use crate::config::{
    LAMP_DEFAULT_STATE, LOAD_PERSISTED_SETTINGS, node_config, provisioning_params,
};
use crate::hal::{SharedBoard, StateFlash};
use crate::mesh::{ChannelStack, MeshEvent, set_provisioned};
use crate::{
    HardwareOutput, MeshEventReceiver, ModelInstance, NodeLifecycle, OnOffServer, OutputChannel,
    StateStore,
};
use lamp_core::{FlashStateStore, MeshNode, restore_lamp_state};

/// Mesh Node Logic - generisch über Hardware und Persistenz
///
/// - Stellt den Lampen-Zustand wieder her (Flash → Hardware → Default)
/// - Startet den Mesh-Stack
/// - Reicht jedes Event an den `MeshNode` aus lamp-core weiter
///
/// Die Event-Verarbeitung selbst ist in lamp-core und dort auf dem Host
/// getestet. Hier bleibt nur das Provisioned-Flag für den `ChannelStack`.
///
/// # Parameter
/// - `events`: Channel Receiver für Events vom Mesh-Stack
/// - `stack`: Command-Seite zum Mesh-Stack
/// - `hardware`: Board (Hardware oder Mock)
/// - `store`: Persistenz für den Lampen-Zustand
pub async fn mesh_node_logic<H, S>(
    events: MeshEventReceiver,
    stack: ChannelStack,
    mut hardware: H,
    mut store: S,
) -> !
where
    H: HardwareOutput,
    S: StateStore,
{
    let initial = restore_lamp_state(
        &mut hardware,
        &mut store,
        OutputChannel::Lamp,
        LAMP_DEFAULT_STATE,
    );
    info!("Node: lamp starts {}", initial);

    let server = OnOffServer::new(ModelInstance::new(initial), hardware, stack, store);
    let lifecycle = NodeLifecycle::new(stack, node_config(), provisioning_params())
        .with_settings(LOAD_PERSISTED_SETTINGS);
    let mut node = MeshNode::new(server, lifecycle);

    // Fehler ist bereits geloggt, der Node wartet trotzdem auf Events
    let _ = node.start();

    loop {
        let event = events.receive().await;
        match event {
            MeshEvent::ProvisioningComplete { .. } => set_provisioned(true),
            MeshEvent::ProvisioningReset => set_provisioned(false),
            _ => {}
        }
        node.handle(event.as_node_event());
    }
}

/// Mesh Node Task - Embassy Task für parallele Ausführung
///
/// Bindet die konkrete Hardware (geteiltes Board, Flash) und ruft dann
/// `mesh_node_logic()` auf.
///
/// # Parameter
/// - `events`: Channel Receiver für Events vom Mesh-Stack
/// - `stack`: Command-Seite zum Mesh-Stack
/// - `board`: geteiltes Board (nur der Lampen-Kanal wird berührt)
/// - `store`: Flash-Persistenz in der eigenen Partition
#[embassy_executor::task]
pub async fn mesh_node_task(
    events: MeshEventReceiver,
    stack: ChannelStack,
    board: SharedBoard,
    store: FlashStateStore<StateFlash>,
) {
    if !LOAD_PERSISTED_SETTINGS {
        warn!("Node: persisted mesh settings disabled");
    }
    mesh_node_logic(events, stack, board, store).await
}
