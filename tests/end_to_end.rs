use glam::Vec2;
use symbios_pen::{
    DrawConfig, DrawPrimitive, Frame, Grammar, GrammarError, GrammarExpander, RenderError,
    Renderer, StopReason, TurtleInterpreter,
};

fn binary_tree() -> (Renderer, Grammar) {
    let renderer = Renderer::new(DrawConfig {
        generations: 3,
        turn_angle: 30.0,
        line_length: 5.0,
        ..Default::default()
    })
    .unwrap();
    (renderer, Grammar::new("A").with_rule('A', "F[+A][-A]"))
}

#[test]
fn binary_tree_golden() {
    let (renderer, grammar) = binary_tree();
    let drawing = renderer.render(&grammar).unwrap();

    assert_eq!(
        drawing.symbols,
        "F[+F[+F[+A][-A]][-F[+A][-A]]][-F[+F[+A][-A]][-F[+A][-A]]]"
    );
    assert_eq!(drawing.primitives.len(), 7);
    assert!(drawing.primitives.iter().all(DrawPrimitive::is_segment));

    // Every branch is popped, leaving the cursor at the tip of the trunk.
    let end = &drawing.summary.state;
    assert_eq!(end.position, Vec2::new(5.0, 0.0));
    assert_eq!(end.heading, 0.0);
    assert_eq!(drawing.summary.stack_depth, 0);

    // Second segment is the first left branch at +30 degrees.
    match &drawing.primitives[1] {
        DrawPrimitive::Segment { from, to, .. } => {
            assert_eq!(*from, Vec2::new(5.0, 0.0));
            let expected = Vec2::new(5.0 + 5.0 * 30f32.to_radians().cos(), 2.5);
            assert!(to.abs_diff_eq(expected, 1e-4), "{to} != {expected}");
        }
        other => panic!("expected segment, got {other:?}"),
    }

    // Deepest left branch: three +30 turns from the trunk tip.
    match &drawing.primitives[2] {
        DrawPrimitive::Segment { to, .. } => {
            let a = 30f32.to_radians();
            let b = 60f32.to_radians();
            let expected = Vec2::new(5.0, 0.0)
                + Vec2::new(a.cos(), a.sin()) * 5.0
                + Vec2::new(b.cos(), b.sin()) * 5.0;
            assert!(to.abs_diff_eq(expected, 1e-4), "{to} != {expected}");
        }
        other => panic!("expected segment, got {other:?}"),
    }
}

#[test]
fn rendering_is_reproducible() {
    let (renderer, grammar) = binary_tree();
    let first = renderer.render(&grammar).unwrap();
    let second = renderer.render(&grammar).unwrap();
    assert_eq!(first, second);
}

#[test]
fn runaway_rule_fails_before_drawing() {
    let renderer = Renderer::new(DrawConfig {
        generations: 64,
        ..Default::default()
    })
    .unwrap();
    let grammar = Grammar::new("A").with_rule('A', "AA");
    match renderer.render(&grammar) {
        Err(RenderError::Grammar(GrammarError::LengthCapExceeded {
            generation, cap, ..
        })) => {
            assert_eq!(cap, GrammarExpander::default().max_symbols());
            // 2^23 is the first power of two above five million.
            assert_eq!(generation, 23);
        }
        other => panic!("expected length cap error, got {other:?}"),
    }
}

#[test]
fn sierpinski_from_rule_string() {
    let grammar = Grammar::parse("F+G+G", "F F+G-F-G+F G GG").unwrap();
    let renderer = Renderer::new(DrawConfig {
        generations: 2,
        ..Default::default()
    })
    .unwrap();
    let drawing = renderer.render(&grammar).unwrap();

    // `G` is not a drawing command here; only the `F`s produce segments.
    let f_count = drawing.symbols.chars().filter(|&c| c == 'F').count();
    assert_eq!(drawing.primitives.len(), f_count);
    assert_eq!(drawing.summary.stop, StopReason::Exhausted);
}

#[test]
fn frames_are_prefixes_of_the_image() {
    let renderer = Renderer::new(DrawConfig {
        generations: 4,
        draws_per_frame: 4,
        ..Default::default()
    })
    .unwrap();
    let grammar = Grammar::new("X").with_rule('X', "F[+X]F[-X]@");
    let drawing = renderer.render(&grammar).unwrap();

    let total = drawing.primitives.len();
    let last = drawing.frames.last().copied().unwrap();
    assert_eq!(last.primitive_count, total);
    for pair in drawing.frames.windows(2) {
        assert_eq!(pair[1].index, pair[0].index + 1);
        assert!(pair[1].primitive_count > pair[0].primitive_count);
    }
    for (frame, slice) in drawing.frames.iter().zip(drawing.frame_slices()) {
        assert_eq!(slice, &drawing.primitives[..frame.primitive_count]);
    }
}

#[test]
fn symbol_triggered_frames() {
    let interpreter = TurtleInterpreter::new(DrawConfig {
        frame_symbols: "]".into(),
        ..Default::default()
    })
    .unwrap();
    let mut primitives = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    interpreter.interpret("F[F]F[F]F", &mut primitives, &mut frames);
    let counts: Vec<_> = frames.iter().map(|f| f.primitive_count).collect();
    assert_eq!(counts, vec![2, 4, 5]);
}

#[test]
fn config_round_trips_through_json() {
    let config: DrawConfig =
        serde_json::from_str(r#"{ "turn_angle": 90.0, "generations": 2, "frame_symbols": "]" }"#)
            .unwrap();
    assert_eq!(config.turn_angle, 90.0);
    assert_eq!(config.generations, 2);
    assert_eq!(config.line_length, DrawConfig::default().line_length);

    let json = serde_json::to_string(&config).unwrap();
    let back: DrawConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn drawing_serializes() {
    let (renderer, grammar) = binary_tree();
    let drawing = renderer.render(&grammar).unwrap();
    let value = serde_json::to_value(&drawing).unwrap();
    assert_eq!(value["primitives"].as_array().unwrap().len(), 7);
    assert_eq!(value["summary"]["stop"], "Exhausted");
}
