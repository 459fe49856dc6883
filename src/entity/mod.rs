pub mod audit_logs;
pub mod receipt_items;
pub mod receipts;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use receipt_items::Entity as ReceiptItems;
pub use receipts::Entity as Receipts;
pub use users::Entity as Users;
