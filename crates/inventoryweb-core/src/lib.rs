//! Inventory payload model, endpoint client and dashboard state
//!
//! - `models`: decoded response body (accounts, instances, cost)
//! - `source`: the `InventorySource` seam and its HTTP implementation
//! - `dashboard`: the state store driven by user activations

pub mod dashboard;
pub mod error;
pub mod models;
pub mod source;

pub use dashboard::{Dashboard, DashboardState};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use models::{AccountEntry, AccountSummary, CostAmount, CostValue, Ec2Inventory, InstanceRecord, InventoryPayload};
pub use source::{HttpInventorySource, InventorySource, SourceRef};
