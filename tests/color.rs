mod tests {
    use myrtio_anim1d::color::{BLACK, Frame, Rgb, add, dim, mix, parse_hex, to_hex};
    use myrtio_anim1d::DecodeError;
    use proptest::prelude::*;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };
    const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn test_dim() {
        assert_eq!(dim(WHITE, 0), BLACK);
        assert_eq!(
            dim(WHITE, 128),
            Rgb {
                r: 127,
                g: 127,
                b: 127
            }
        );
        // Full intensity loses the top step, matching `(c*i + i/2) >> 8`.
        assert_eq!(
            dim(WHITE, 255),
            Rgb {
                r: 254,
                g: 254,
                b: 254
            }
        );
        assert_eq!(dim(BLACK, 255), BLACK);
    }

    #[test]
    fn test_add() {
        assert_eq!(add(RED, BLUE), Rgb::new(255, 0, 255));
        assert_eq!(add(Rgb::new(200, 10, 0), Rgb::new(100, 10, 0)), Rgb::new(255, 20, 0));
        assert_eq!(add(WHITE, WHITE), WHITE);
    }

    #[test]
    fn test_mix() {
        assert_eq!(mix(RED, BLUE, 0), RED);
        assert_eq!(mix(RED, BLUE, 255), BLUE);
        assert_eq!(mix(RED, BLUE, 128), Rgb::new(127, 0, 128));
        assert_eq!(mix(BLACK, WHITE, 128), Rgb::new(128, 128, 128));
        assert_eq!(mix(BLACK, BLACK, 77), BLACK);
        assert_eq!(mix(WHITE, WHITE, 77), WHITE);
    }

    proptest! {
        #[test]
        fn mix_stays_between_inputs(a: u8, b: u8, gradient: u8) {
            let c = mix(Rgb::new(a, a, a), Rgb::new(b, b, b), gradient);
            prop_assert!(c.r >= a.min(b) && c.r <= a.max(b));
        }

        #[test]
        fn add_saturates(a: u8, b: u8) {
            let c = add(Rgb::new(a, 0, 0), Rgb::new(b, 0, 0));
            prop_assert_eq!(u16::from(c.r), (u16::from(a) + u16::from(b)).min(255));
        }
    }

    #[test]
    fn test_hex() {
        assert_eq!(to_hex(Rgb::new(0x12, 0xab, 0x00)), "#12ab00");
        assert_eq!(parse_hex("#12AB00").unwrap(), Rgb::new(0x12, 0xab, 0x00));
        assert!(matches!(parse_hex("12ab00"), Err(DecodeError::InvalidColor(_))));
        assert!(matches!(parse_hex("#12ab0"), Err(DecodeError::InvalidColor(_))));
        assert!(matches!(parse_hex("#12ab0g"), Err(DecodeError::InvalidColor(_))));
    }

    #[test]
    fn test_frame_text() {
        let frame = Frame::from_colors(vec![RED, BLUE]);
        assert_eq!(frame.to_string(), "Lff00000000ff");
        assert_eq!("Lff00000000ff".parse::<Frame>().unwrap(), frame);
        assert_eq!("L".parse::<Frame>().unwrap(), Frame::default());

        for bad in ["", "ff0000", "Lff00", "Lff00zz", "L\u{e9}\u{e9}\u{e9}"] {
            assert!(
                matches!(bad.parse::<Frame>(), Err(DecodeError::InvalidFrame(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_frame_ops() {
        let mut frame = Frame::new(3);
        assert_eq!(&frame[..], &[BLACK; 3]);

        frame.add(&[RED, BLUE]);
        assert_eq!(&frame[..], &[RED, BLUE, BLACK]);

        frame.mix(&[BLUE, BLUE, BLUE], 255);
        assert_eq!(&frame[..], &[BLUE; 3]);

        frame.dim(0);
        assert_eq!(&frame[..], &[BLACK; 3]);

        frame[0] = WHITE;
        frame.reset(2);
        assert_eq!(&frame[..], &[BLACK; 2]);
    }

    #[test]
    fn test_frame_rgb_bytes() {
        let frame = Frame::from_colors(vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]);
        let mut out = [0u8; 6];
        frame.to_rgb_bytes(&mut out);
        assert_eq!(out, [1, 2, 3, 4, 5, 6]);

        let mut short = [0u8; 4];
        frame.to_rgb_bytes(&mut short);
        assert_eq!(short, [1, 2, 3, 0]);
    }
}
