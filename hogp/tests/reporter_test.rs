mod common;
pub(crate) use crate::common::*;

mod reporter_test {
    use super::*;

    use core::cell::RefCell;

    use embassy_futures::block_on;
    use embassy_futures::select::{Either, select};
    use embassy_time::{Duration, Instant, Timer};
    use hogp::{
        AttributeId, HidError, HidService, InputReportChannel, InputReporter, NotifyError, PacingConfig, ReportType,
        SharedHidService, queue_report,
    };
    use log::debug;

    fn report(n: u8) -> [u8; 8] {
        [0, 0, n, 0, 0, 0, 0, 0]
    }

    #[test]
    fn test_reports_are_paced() {
        let service = SharedHidService::new(RefCell::new(HidService::new(input_only_config()).unwrap()));
        let reports = InputReportChannel::<4>::new();
        for n in 1..=3 {
            assert_eq!(queue_report(&reports, &report(n)), Ok(true));
        }

        let config = PacingConfig::new(Duration::from_millis(15));
        let mut reporter = InputReporter::new(&service, &reports, RecordingNotifier::default(), config);
        block_on(async {
            let start = Instant::now();
            for _ in 0..3 {
                reporter.send_next().await.unwrap();
            }
            let elapsed = start.elapsed();
            debug!("3 reports sent in {}ms", elapsed.as_millis());
            assert!(elapsed >= Duration::from_millis(45));
        });

        let sent: Vec<_> = reporter.notifier().sent.iter().map(|(_, v)| v.clone()).collect();
        assert_eq!(sent, vec![report(1).to_vec(), report(2).to_vec(), report(3).to_vec()]);
        assert!(
            reporter
                .notifier()
                .sent
                .iter()
                .all(|(id, _)| *id == AttributeId::Report(ReportType::Input))
        );
        service.lock(|s| {
            assert_eq!(
                s.borrow().value(AttributeId::Report(ReportType::Input)),
                Some(&report(3)[..])
            );
        });
    }

    #[test]
    fn test_failed_report_is_dropped() {
        let service = SharedHidService::new(RefCell::new(HidService::new(input_only_config()).unwrap()));
        let reports = InputReportChannel::<4>::new();
        queue_report(&reports, &report(7)).unwrap();
        queue_report(&reports, &[1, 2, 3]).unwrap();

        let notifier = RecordingNotifier {
            fail_with: Some(NotifyError::NotConnected),
            ..Default::default()
        };
        let mut reporter = InputReporter::new(&service, &reports, notifier, PacingConfig::default());
        block_on(async {
            assert_eq!(
                reporter.send_next().await,
                Err(HidError::Notify(NotifyError::NotConnected))
            );
            assert_eq!(
                reporter.send_next().await,
                Err(HidError::LengthMismatch { expected: 8, actual: 3 })
            );
        });
        // The failed notification still updated the stored value
        service.lock(|s| {
            assert_eq!(
                s.borrow().value(AttributeId::Report(ReportType::Input)),
                Some(&report(7)[..])
            );
        });
        assert!(reporter.notifier().sent.is_empty());
    }

    #[test]
    fn test_rejected_report_skips_interval() {
        let service = SharedHidService::new(RefCell::new(HidService::new(input_only_config()).unwrap()));
        let reports = InputReportChannel::<4>::new();
        queue_report(&reports, &[1, 2, 3]).unwrap();
        queue_report(&reports, &report(1)).unwrap();

        let config = PacingConfig::new(Duration::from_millis(300));
        let mut reporter = InputReporter::new(&service, &reports, RecordingNotifier::default(), config);
        block_on(async {
            let start = Instant::now();
            assert_eq!(
                reporter.send_next().await,
                Err(HidError::LengthMismatch { expected: 8, actual: 3 })
            );
            assert!(start.elapsed() < Duration::from_millis(300));

            let start = Instant::now();
            reporter.send_next().await.unwrap();
            assert!(start.elapsed() >= Duration::from_millis(300));
        });
        assert_eq!(reporter.notifier().sent.len(), 1);
    }

    #[test]
    fn test_run_drains_queue() {
        let service = SharedHidService::new(RefCell::new(HidService::new(input_only_config()).unwrap()));
        let reports = InputReportChannel::<4>::new();
        queue_report(&reports, &report(1)).unwrap();
        queue_report(&reports, &report(2)).unwrap();

        let config = PacingConfig::new(Duration::from_millis(12));
        let mut reporter = InputReporter::new(&service, &reports, RecordingNotifier::default(), config);
        block_on(async {
            match select(reporter.run(), Timer::after(Duration::from_millis(200))).await {
                Either::First(_) => panic!("reporter stopped"),
                Either::Second(_) => {}
            }
        });
        assert_eq!(reporter.notifier().sent.len(), 2);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_queue_full() {
        let reports = InputReportChannel::<2>::new();
        assert_eq!(queue_report(&reports, &report(1)), Ok(true));
        assert_eq!(queue_report(&reports, &report(2)), Ok(true));
        assert_eq!(queue_report(&reports, &report(3)), Ok(false));
        assert_eq!(
            queue_report(&reports, &[0u8; 65]),
            Err(HidError::ReportTooLong(ReportType::Input))
        );
    }
}
