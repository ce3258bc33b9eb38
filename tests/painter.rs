mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration as StdDuration, Instant as StdInstant};

    use embassy_time::Duration;
    use myrtio_anim1d::{DriverError, OutputDriver, Painter, PainterConfig, PainterError};

    const PIXELS: usize = 4;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[derive(Clone, Default)]
    struct Recorder {
        frames: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl Recorder {
        fn last(&self) -> Option<Vec<u8>> {
            self.frames.lock().unwrap().last().cloned()
        }

        fn count(&self) -> usize {
            self.frames.lock().unwrap().len()
        }
    }

    impl OutputDriver for Recorder {
        fn write(&mut self, rgb: &[u8]) -> Result<(), DriverError> {
            self.frames.lock().unwrap().push(rgb.to_vec());
            Ok(())
        }

        fn pixel_count(&self) -> usize {
            PIXELS
        }
    }

    struct Failing {
        attempts: Arc<AtomicUsize>,
    }

    impl OutputDriver for Failing {
        fn write(&mut self, _rgb: &[u8]) -> Result<(), DriverError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(DriverError::message("bus unplugged"))
        }

        fn pixel_count(&self) -> usize {
            PIXELS
        }
    }

    fn solid(r: u8, g: u8, b: u8) -> Vec<u8> {
        [r, g, b].repeat(PIXELS)
    }

    fn wait_until(mut done: impl FnMut() -> bool) -> bool {
        let deadline = StdInstant::now() + StdDuration::from_secs(5);
        while StdInstant::now() < deadline {
            if done() {
                return true;
            }
            std::thread::sleep(StdDuration::from_millis(5));
        }
        done()
    }

    fn config() -> PainterConfig {
        PainterConfig::default().with_fps(200)
    }

    #[test]
    fn test_shows_black_then_pattern() {
        init_tracing();
        let recorder = Recorder::default();
        let painter = Painter::new(recorder.clone(), config()).unwrap();
        assert_eq!(painter.pixel_count(), PIXELS);

        assert!(wait_until(|| recorder.count() > 0));
        assert_eq!(recorder.frames.lock().unwrap()[0], solid(0, 0, 0));

        painter
            .set_pattern("\"#ff0000\"", Duration::from_ticks(0))
            .unwrap();
        assert!(wait_until(|| recorder.last() == Some(solid(255, 0, 0))));
    }

    #[test]
    fn test_crossfade_reaches_pattern() {
        init_tracing();
        let recorder = Recorder::default();
        let painter = Painter::new(recorder.clone(), config()).unwrap();
        painter
            .set_pattern("\"#0000ff\"", Duration::from_millis(50))
            .unwrap();
        assert!(wait_until(|| recorder.last() == Some(solid(0, 0, 255))));
    }

    #[test]
    fn test_startup_pattern() {
        init_tracing();
        let recorder = Recorder::default();
        let config = config()
            .with_default_crossfade_ms(0)
            .with_startup("\"#00ff00\"");
        let _painter = Painter::new(recorder.clone(), config).unwrap();
        assert!(wait_until(|| recorder.last() == Some(solid(0, 255, 0))));
    }

    #[test]
    fn test_invalid_payload_is_rejected() {
        init_tracing();
        let recorder = Recorder::default();
        let painter = Painter::new(recorder.clone(), config()).unwrap();
        painter
            .set_pattern("\"#ff0000\"", Duration::from_ticks(0))
            .unwrap();

        let err = painter
            .set_pattern("\"#nothex\"", Duration::from_ticks(0))
            .unwrap_err();
        assert!(matches!(err, PainterError::Decode(_)));
        let err = painter
            .set_pattern(r#"{"_type":"Sparkle"}"#, Duration::from_ticks(0))
            .unwrap_err();
        assert!(matches!(err, PainterError::Decode(_)));

        let before = recorder.count();
        assert!(wait_until(|| recorder.count() > before + 3));
        assert_eq!(recorder.last(), Some(solid(255, 0, 0)));
    }

    #[test]
    fn test_driver_errors_do_not_stop_rendering() {
        init_tracing();
        let attempts = Arc::new(AtomicUsize::new(0));
        let painter = Painter::new(
            Failing {
                attempts: Arc::clone(&attempts),
            },
            config(),
        )
        .unwrap();
        assert!(wait_until(|| attempts.load(Ordering::SeqCst) > 5));
        painter
            .set_pattern("\"#ff0000\"", Duration::from_ticks(0))
            .unwrap();
        let seen = attempts.load(Ordering::SeqCst);
        assert!(wait_until(|| attempts.load(Ordering::SeqCst) > seen + 5));
        assert!(!painter.is_closed());
    }

    #[test]
    fn test_close() {
        init_tracing();
        let recorder = Recorder::default();
        let mut painter = Painter::new(recorder.clone(), config()).unwrap();
        assert!(wait_until(|| recorder.count() > 0));

        painter.close();
        assert!(painter.is_closed());
        painter.close();

        let written = recorder.count();
        std::thread::sleep(StdDuration::from_millis(30));
        assert_eq!(recorder.count(), written);

        let err = painter
            .set_pattern("\"#ff0000\"", Duration::from_ticks(0))
            .unwrap_err();
        assert!(matches!(err, PainterError::Closed));
    }

    #[test]
    fn test_shared_between_threads() {
        init_tracing();
        let recorder = Recorder::default();
        let painter = Arc::new(Painter::new(recorder.clone(), config()).unwrap());
        let handles: Vec<_> = ["\"#010101\"", "\"#020202\"", "\"#030303\""]
            .into_iter()
            .map(|payload| {
                let painter = Arc::clone(&painter);
                std::thread::spawn(move || {
                    painter
                        .set_pattern(payload, Duration::from_ticks(0))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        painter
            .set_pattern("\"#ffffff\"", Duration::from_ticks(0))
            .unwrap();
        assert!(wait_until(|| recorder.last() == Some(solid(255, 255, 255))));
    }
}
