mod blank_node_mode;
mod dataset;
mod external_bindings;

pub use blank_node_mode::BlankNodeMode;
pub use dataset::DatasetClause;
pub use external_bindings::ExternalBindings;
