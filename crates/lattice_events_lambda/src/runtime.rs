pub use lattice_events_core::{config, contract, error, events, tags};
