// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Indicator und Node teilen sich nur das Board (verschiedene Kanäle).

pub mod indicator;
pub mod node;

// Re-export Tasks für einfachen Import
pub use indicator::indicator_blink_task;
pub use node::mesh_node_task;
