pub mod batch;
pub mod date;
pub mod order;
pub mod pending;
pub mod record;
pub mod result;

pub use batch::Batch;
pub use date::{ErpDate, CREATION_DATE_FORMAT, INVOICE_DATE_FORMAT};
pub use order::{OrderId, OrderLine};
pub use pending::PendingMaterial;
pub use record::{BatchRecord, OrderRecord, PendingRecord};
pub use result::{ReconcileStats, ReconciledBatch};
