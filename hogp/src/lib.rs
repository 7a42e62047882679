//! HID over GATT profile (HOGP) service for Bluetooth LE peripherals.
//!
//! [`HidService`] owns the report map, the report buffers, the protocol mode and the control
//! point of a HID service, and validates every host access against them. The BLE stack is
//! reached through [`Notifier`] for outgoing notifications, and by forwarding host reads and
//! writes to [`HidService::on_read`] and [`HidService::on_write`].
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod ble;
pub mod config;
pub mod hid;
pub mod reporter;

pub use ble::gatt::{AttError, AttributeDescriptor, AttributeId, AttributeKind, Properties, ServiceLayout};
pub use ble::hid_service::{HidService, HidServiceEvent};
pub use config::{ConnectionInterval, HidServiceConfig, PacingConfig, ReportConfig};
pub use hid::{
    ControlPointCommand, HidError, HidInfoFlags, HidInformation, Notifier, NotifyError, ProtocolMode,
    ReportReference, ReportType,
};
pub use reporter::{InputReport, InputReportChannel, InputReporter, SharedHidService, queue_report};

/// Mutex type used by the shared state of this crate
pub type RawMutex = embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
