mod tests {
    use myrtio_anim1d::color::{BLACK, Frame, Rgb, mix};
    use myrtio_anim1d::pattern::{
        Add, Aurore, Chronometer, Crop, Cycle, Dim, Gradient, Loop, Mixer, NightStars, PingPong,
        Rainbow, Repeated, Rotate, Scale, Transition, Trim, wavelength_to_rgb,
    };
    use myrtio_anim1d::{Curve, DecodeError, Interpolation, Pattern, Render, SPattern, Value};

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    fn frame(colors: &[Rgb]) -> Frame {
        Frame::from(colors)
    }

    fn render(p: &mut impl Render, len: usize, time_ms: u32) -> Vec<Rgb> {
        let mut pixels = vec![BLACK; len];
        p.render(&mut pixels, time_ms);
        pixels
    }

    #[test]
    fn test_color_and_frame() {
        assert_eq!(render(&mut Pattern::Color(RED), 3, 0), [RED; 3]);

        let mut p = Pattern::Frame(frame(&[RED, BLUE]));
        assert_eq!(render(&mut p, 3, 0), [RED, BLUE, BLACK]);
        assert_eq!(render(&mut p, 1, 0), [RED]);
    }

    #[test]
    fn test_repeated() {
        let mut p = Repeated::new(frame(&[RED, BLUE]));
        assert_eq!(render(&mut p, 5, 0), [RED, BLUE, RED, BLUE, RED]);
        assert_eq!(render(&mut Repeated::default(), 2, 0), [BLACK; 2]);
    }

    #[test]
    fn test_rainbow() {
        let mut p = Rainbow::new();
        let first = render(&mut p, 16, 0);
        assert_eq!(first.len(), 16);
        assert!(first.iter().any(|c| *c != BLACK));
        // Static and cached per length.
        assert_eq!(render(&mut p, 16, 5000), first);
        assert_eq!(render(&mut p, 4, 0).len(), 4);

        assert_eq!(wavelength_to_rgb(300), BLACK);
        assert_eq!(wavelength_to_rgb(450), Rgb::new(0, 51, 255));
        assert_eq!(wavelength_to_rgb(600), Rgb::new(255, 176, 0));
        assert_eq!(wavelength_to_rgb(900), BLACK);
    }

    #[test]
    fn test_gradient() {
        let mut p = Gradient::new(RED, BLUE, Curve::Direct);
        assert_eq!(render(&mut p, 3, 0), [RED, mix(RED, BLUE, 127), BLUE]);
        assert_eq!(render(&mut p, 1, 0), [mix(RED, BLUE, 127)]);
    }

    #[test]
    fn test_transition() {
        let mut p = Transition::new(RED, BLUE, 100, 100, Curve::Direct);
        assert_eq!(render(&mut p, 2, 50), [RED; 2]);
        assert_eq!(render(&mut p, 2, 100), [RED; 2]);
        assert_eq!(render(&mut p, 2, 150), [Rgb::new(128, 0, 127); 2]);
        assert!(!p.is_done(199));
        assert!(p.is_done(200));
        assert_eq!(render(&mut p, 2, 200), [BLUE; 2]);
        assert_eq!(render(&mut p, 2, 10_000), [BLUE; 2]);
    }

    #[test]
    fn test_transition_shifts_time_for_after() {
        let after = Cycle::new(vec![SPattern::new(GREEN), SPattern::new(BLUE)], 100);
        let mut p = Transition::new(RED, after, 1000, 0, Curve::Direct);
        assert_eq!(render(&mut p, 1, 1050), [GREEN]);
        assert_eq!(render(&mut p, 1, 1150), [BLUE]);
    }

    #[test]
    fn test_cycle() {
        let mut p = Cycle::new(vec![SPattern::new(RED), SPattern::new(BLUE)], 100);
        assert_eq!(render(&mut p, 1, 0), [RED]);
        assert_eq!(render(&mut p, 1, 99), [RED]);
        assert_eq!(render(&mut p, 1, 100), [BLUE]);
        assert_eq!(render(&mut p, 1, 250), [RED]);

        let mut still = Cycle::new(vec![SPattern::new(RED), SPattern::new(BLUE)], 0);
        assert_eq!(render(&mut still, 1, 5000), [RED]);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_cycle_from_png() {
        let img =
            image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8 * 10, y as u8 * 100, 7]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let rows = Cycle::from_png(&png, 40, false).unwrap();
        assert_eq!(rows.frame_duration_ms, 40);
        let expected: Vec<SPattern> = (0..2u8)
            .map(|y| {
                let colors = (0..3u8).map(|x| Rgb::new(x * 10, y * 100, 7)).collect();
                SPattern::new(Frame::from_colors(colors))
            })
            .collect();
        assert_eq!(rows.frames, expected);

        let mut columns = Cycle::from_png(&png, 40, true).unwrap();
        assert_eq!(columns.frames.len(), 3);
        assert_eq!(
            render(&mut columns, 2, 80),
            [Rgb::new(20, 0, 7), Rgb::new(20, 100, 7)]
        );

        assert!(matches!(
            Cycle::from_png(b"not a png", 40, false),
            Err(DecodeError::Image(_))
        ));
    }

    #[test]
    fn test_loop() {
        let patterns = vec![SPattern::new(RED), SPattern::new(BLUE)];
        let mut p = Loop::new(patterns, 100, 100, Curve::Direct);
        assert_eq!(render(&mut p, 1, 50), [RED]);
        assert_eq!(render(&mut p, 1, 150), [Rgb::new(128, 0, 127)]);
        assert_eq!(render(&mut p, 1, 250), [BLUE]);
        assert_eq!(render(&mut p, 1, 350), [Rgb::new(127, 0, 128)]);
        assert_eq!(render(&mut p, 1, 400), [RED]);
    }

    #[test]
    fn test_rotate() {
        let (a, b, c) = (RED, GREEN, BLUE);
        let mut p = Rotate::new(frame(&[a, b, c]), Value::Const(100));
        assert_eq!(render(&mut p, 3, 0), [a, b, c]);
        assert_eq!(render(&mut p, 3, 10), [c, a, b]);
        assert_eq!(render(&mut p, 3, 20), [b, c, a]);
        assert_eq!(render(&mut p, 3, 30), [a, b, c]);

        let mut reverse = Rotate::new(frame(&[a, b, c]), Value::Const(-100));
        assert_eq!(render(&mut reverse, 3, 10), [b, c, a]);
        assert_eq!(render(&mut reverse, 3, 20), [c, a, b]);
    }

    #[test]
    fn test_ping_pong() {
        let (head, trail) = (RED, GREEN);
        let mut p = PingPong::new(frame(&[head, trail]), Value::Const(100));
        let expected = [
            [head, trail, BLACK],
            [trail, head, BLACK],
            [BLACK, trail, head],
            [BLACK, head, trail],
            [head, trail, BLACK],
        ];
        for (i, e) in expected.iter().enumerate() {
            let t = u32::try_from(i).unwrap() * 10;
            assert_eq!(render(&mut p, 3, t), e, "move {i}");
        }
        assert_eq!(render(&mut p, 1, 30), [head]);
    }

    #[test]
    fn test_chronometer() {
        let (bg, sec, min, hour) = (BLACK, RED, GREEN, BLUE);
        let mut p = Chronometer::new(frame(&[bg, sec, min, hour]));

        let mut expected = vec![bg; 10];
        expected[0] = sec;
        assert_eq!(render(&mut p, 10, 0), expected);

        let mut expected = vec![bg; 10];
        expected[0] = min;
        expected[2] = sec;
        assert_eq!(render(&mut p, 10, 10_000), expected);

        // 1h 1m 1s
        let mut expected = vec![bg; 10];
        expected[0] = sec;
        expected[1] = hour;
        assert_eq!(render(&mut p, 10, 3_661_000), expected);
    }

    #[test]
    fn test_chronometer_six_pixels() {
        let (bg, r, g, b) = (WHITE, RED, GREEN, BLUE);
        let mut p = Chronometer::new(frame(&[bg, r, g, b]));
        assert_eq!(render(&mut p, 6, 0), [r, bg, bg, bg, bg, bg]);
        assert_eq!(render(&mut p, 6, 10_000), [g, r, bg, bg, bg, bg]);
    }

    #[test]
    fn test_crop() {
        let mut p = Crop::new(GREEN, Value::Const(1), Value::Const(2));
        assert_eq!(render(&mut p, 5, 0), [BLACK, GREEN, GREEN, BLACK, BLACK]);

        let mut clipped = Crop::new(GREEN, Value::Const(4), Value::Const(10));
        assert_eq!(render(&mut clipped, 5, 0), [BLACK, BLACK, BLACK, BLACK, GREEN]);

        let mut outside = Crop::new(GREEN, Value::Const(10), Value::Const(2));
        assert_eq!(render(&mut outside, 5, 0), [BLACK; 5]);

        let mut whole = Crop {
            child: SPattern::new(GREEN),
            ..Crop::default()
        };
        assert_eq!(render(&mut whole, 3, 0), [GREEN; 3]);

        let mut half = Crop::new(GREEN, Value::Const(0), Value::percent(50.0));
        assert_eq!(render(&mut half, 4, 0), [GREEN, GREEN, BLACK, BLACK]);
    }

    #[test]
    fn test_trim() {
        let colors = [RED, GREEN, BLUE, WHITE, RED];
        let mut p = Trim::new(frame(&colors), Value::Const(1), Value::Const(1));
        assert_eq!(render(&mut p, 3, 0), [GREEN, BLUE, WHITE]);

        let mut none = Trim::new(frame(&colors), Value::Const(0), Value::Const(0));
        assert_eq!(render(&mut none, 2, 0), [RED, GREEN]);
    }

    #[test]
    fn test_scale() {
        let child = frame(&[RED, BLUE]);
        let mut p = Scale::new(child.clone(), Interpolation::Nearest).with_length(Value::Const(2));
        assert_eq!(render(&mut p, 4, 0), [RED, RED, BLUE, BLUE]);

        let mut ratio = Scale::new(child.clone(), Interpolation::Nearest).with_ratio_milli(500);
        assert_eq!(render(&mut ratio, 4, 0), [RED, RED, BLUE, BLUE]);

        let mut same = Scale::new(child, Interpolation::Nearest);
        assert_eq!(render(&mut same, 2, 0), [RED, BLUE]);
    }

    #[test]
    fn test_mixer() {
        let patterns = vec![
            SPattern::new(Rgb::new(200, 0, 0)),
            SPattern::new(Rgb::new(0, 0, 100)),
        ];
        let mut p = Mixer::new(patterns.clone(), vec![0.5, 1.0]);
        assert_eq!(render(&mut p, 2, 0), [Rgb::new(100, 0, 100); 2]);

        let mut saturated = Mixer::new(patterns.clone(), vec![2.0, 3.0]);
        assert_eq!(render(&mut saturated, 1, 0), [Rgb::new(255, 0, 255)]);

        let mut mismatched = Mixer::new(patterns, vec![1.0]);
        let mut pixels = vec![GREEN; 2];
        mismatched.render(&mut pixels, 0);
        assert_eq!(pixels, [GREEN; 2]);

        let mut empty = Mixer::default();
        assert_eq!(render(&mut empty, 2, 0), [BLACK; 2]);
    }

    #[test]
    fn test_mixer_non_finite_weights_count_as_zero() {
        let patterns = vec![
            SPattern::new(Rgb::new(200, 0, 0)),
            SPattern::new(Rgb::new(0, 0, 100)),
            SPattern::new(Rgb::new(0, 50, 0)),
        ];
        let mut p = Mixer::new(patterns, vec![f32::NAN, 1.0, f32::INFINITY]);
        assert_eq!(render(&mut p, 2, 0), [Rgb::new(0, 0, 100); 2]);
    }

    #[test]
    fn test_add() {
        let mut p = Add::new(vec![
            SPattern::new(Rgb::new(200, 0, 0)),
            SPattern::new(Rgb::new(100, 10, 0)),
            SPattern::empty(),
        ]);
        assert_eq!(render(&mut p, 2, 0), [Rgb::new(255, 10, 0); 2]);
    }

    #[test]
    fn test_dim() {
        let mut p = Dim::new(WHITE, Value::Const(128));
        assert_eq!(render(&mut p, 2, 0), [Rgb::new(127, 127, 127); 2]);

        let mut loud = Dim::new(WHITE, Value::Const(1000));
        assert_eq!(render(&mut loud, 1, 0), [Rgb::new(254, 254, 254)]);

        let mut off = Dim::new(WHITE, Value::Const(-5));
        assert_eq!(render(&mut off, 1, 0), [BLACK]);
    }

    #[test]
    fn test_aurore() {
        let mut p = Aurore::new();
        let frame = render(&mut p, 60, 1000);
        assert!(frame.iter().all(|c| c.r == 0 && c.b == 0 && c.g < 64));
        assert_eq!(frame[18], Rgb::new(0, 20, 0));
        assert_eq!(render(&mut p, 60, 1000), frame);
        // The glow fades out completely at the bottom of its pulse.
        assert_eq!(render(&mut p, 60, 4712), [BLACK; 60]);
    }

    #[test]
    fn test_night_stars() {
        let mut p = NightStars::default();
        let first = render(&mut p, 100, 0);
        assert_eq!(render(&mut p, 100, 0), first);

        let lit: Vec<usize> = (0..100).filter(|&i| first[i] != BLACK).collect();
        assert!((5..=50).contains(&lit.len()), "{} stars", lit.len());
        assert!(first.iter().all(|c| c.r == c.g && c.g == c.b && c.r <= 142));

        // Stars keep their place and flicker from tick to tick.
        let frames: Vec<_> = [100, 200, 300, 400]
            .into_iter()
            .map(|t| render(&mut p, 100, t))
            .collect();
        for f in &frames {
            let same: Vec<usize> = (0..100).filter(|&i| f[i] != BLACK).collect();
            assert_eq!(same, lit);
        }
        assert!(frames.iter().any(|f| *f != first));

        let orange = Rgb::new(255, 144, 0);
        let mut tinted = NightStars::new(orange);
        let colored = render(&mut tinted, 100, 0);
        for (i, c) in colored.iter().enumerate() {
            assert!(c.b == 0 && c.g <= c.r, "{c:?}");
            if first[i] == BLACK {
                assert_eq!(*c, BLACK);
            }
        }
    }

    fn every_node(child: &SPattern) -> Vec<Pattern> {
        let c = || child.clone();
        vec![
            Pattern::Color(RED),
            Pattern::Frame(Frame::default()),
            Rainbow::new().into(),
            Repeated::default().into(),
            Gradient::new(c(), c(), Curve::default()).into(),
            Transition::new(c(), c(), 10, 10, Curve::default()).into(),
            Cycle::new(vec![c()], 10).into(),
            Loop::new(vec![c(), c()], 10, 10, Curve::default()).into(),
            Rotate::new(c(), Value::Const(100)).into(),
            Chronometer::new(c()).into(),
            PingPong::new(c(), Value::Const(100)).into(),
            Crop::new(c(), Value::Const(1), Value::Const(1)).into(),
            Trim::new(c(), Value::Const(1), Value::Const(1)).into(),
            Mixer::new(vec![c()], vec![1.0]).into(),
            Add::new(vec![c()]).into(),
            Dim::new(c(), Value::Const(100)).into(),
            Scale::new(c(), Interpolation::Linear)
                .with_ratio_milli(2000)
                .into(),
            Aurore::new().into(),
            NightStars::new(c()).into(),
        ]
    }

    #[test]
    fn test_zero_length_and_empty_children() {
        for child in [SPattern::empty(), SPattern::new(RED), SPattern::new(Rainbow::new())] {
            for mut p in every_node(&child) {
                for t in [0, 5, 15, 25, 1000, u32::MAX] {
                    for len in [0, 1, 2, 7] {
                        let _ = render(&mut p, len, t);
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_handle() {
        let mut p = SPattern::empty();
        let mut pixels = vec![GREEN; 3];
        p.render(&mut pixels, 0);
        assert_eq!(pixels, [GREEN; 3]);
        assert!(p.is_empty());
        assert!(SPattern::new(RED).pattern().is_some());
    }
}
