//! Paced delivery of input reports.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use heapless::Vec;

use crate::RawMutex;
use crate::ble::hid_service::HidService;
use crate::config::PacingConfig;
use crate::hid::{HidError, MAX_REPORT_LEN, Notifier, ReportType};

/// An input report waiting to be sent
pub type InputReport = Vec<u8, MAX_REPORT_LEN>;

/// Queue of input reports produced by the application
pub type InputReportChannel<const N: usize> = Channel<RawMutex, InputReport, N>;

/// HID service shared between the GATT event handler and the reporter
pub type SharedHidService<'a> = Mutex<RawMutex, RefCell<HidService<'a>>>;

/// Sends queued input reports, at most one per report interval.
///
/// Calling `HidService::send` back-to-back overruns the notification queue of the BLE stack,
/// so reports produced by the application go through a channel and this reporter drains it,
/// waiting a full interval after every send to let the stack process its events.
pub struct InputReporter<'s, 'm, N: Notifier, const Q: usize> {
    service: &'s SharedHidService<'m>,
    reports: &'s InputReportChannel<Q>,
    notifier: N,
    interval: Duration,
}

impl<'s, 'm, N: Notifier, const Q: usize> InputReporter<'s, 'm, N, Q> {
    pub fn new(
        service: &'s SharedHidService<'m>,
        reports: &'s InputReportChannel<Q>,
        notifier: N,
        config: PacingConfig,
    ) -> Self {
        Self {
            service,
            reports,
            notifier,
            interval: config.interval(),
        }
    }

    /// Run the reporter task.
    ///
    /// Failed reports are dropped, retrying is left to the application.
    pub async fn run(&mut self) {
        loop {
            if let Err(e) = self.send_next().await {
                warn!("Dropped input report: {:?}", e);
            }
        }
    }

    /// Wait for the next queued report, send it, then wait for the report interval.
    ///
    /// Reports rejected before reaching the notifier don't consume an interval.
    pub async fn send_next(&mut self) -> Result<(), HidError> {
        let report = self.reports.receive().await;
        trace!("Sending input report: {:?}", report.as_slice());
        let result = self
            .service
            .lock(|service| service.borrow_mut().send(&mut self.notifier, &report));
        if matches!(result, Ok(()) | Err(HidError::Notify(_))) {
            Timer::after(self.interval).await;
        }
        result
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}

/// Queue an input report, return `false` if the queue is full
pub fn queue_report<const Q: usize>(reports: &InputReportChannel<Q>, report: &[u8]) -> Result<bool, HidError> {
    let report = InputReport::from_slice(report).map_err(|_| HidError::ReportTooLong(ReportType::Input))?;
    Ok(reports.try_send(report).is_ok())
}
