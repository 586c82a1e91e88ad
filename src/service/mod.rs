pub mod batch;
pub mod reconciler;
pub mod sink;
pub mod validate;

pub use batch::BatchProcessor;
pub use reconciler::{reconcile, ExhaustedLinePolicy, Reconciler, Reconciliation};
pub use sink::{deliver_all, sinks_for, BatchSink, JsonFileSink, LabelManifestSink};
pub use validate::{parse_quantity, validate_batch, QuantityFormat};
