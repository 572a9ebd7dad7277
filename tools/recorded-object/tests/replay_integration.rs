use recorded_object::{
    Arguments, AttributeDecl, CallError, Describe, RecordedClass, RecordedObject, Signature,
    Target, TargetError, TargetInfo, Value,
};
use std::sync::Arc;

// ── helpers ───────────────────────────────────────────────────────────────────

/// An order-sensitive drawing: every operation depends on the cursor left by
/// the previous one.
#[derive(Debug, Default, Clone, PartialEq)]
struct Sketch {
    cursor: (i64, i64),
    factor: i64,
    segments: Vec<((i64, i64), (i64, i64))>,
    labels: Vec<(String, i64)>,
    style: Vec<(String, Value)>,
}

impl Sketch {
    fn new() -> Self {
        Self {
            factor: 1,
            ..Self::default()
        }
    }
}

fn int_arg(args: &Arguments, position: usize, name: &str) -> Result<i64, TargetError> {
    args.get(position, name)
        .and_then(Value::as_i64)
        .ok_or_else(|| format!("{name} must be an integer").into())
}

impl Describe for Sketch {
    fn target_info() -> TargetInfo {
        TargetInfo::new("Sketch")
            .attribute(
                AttributeDecl::operation("move_to", Signature::new(["x", "y"]))
                    .with_doc("Move the cursor without drawing."),
            )
            .operation("line_to", Signature::new(["x", "y"]))
            .operation("scale", Signature::new(["factor"]))
            .operation("label", Signature::new(["text", "size"]).with_defaults(1))
            .operation("style", Signature::empty().with_varkw())
            .operation("_flush", Signature::empty())
            .attribute(AttributeDecl::property("bounds"))
    }
}

impl Target for Sketch {
    fn invoke(&mut self, operation: &str, args: &Arguments) -> Result<(), TargetError> {
        match operation {
            "move_to" => {
                self.cursor = (
                    int_arg(args, 0, "x")? * self.factor,
                    int_arg(args, 1, "y")? * self.factor,
                );
            }
            "line_to" => {
                let to = (
                    int_arg(args, 0, "x")? * self.factor,
                    int_arg(args, 1, "y")? * self.factor,
                );
                self.segments.push((self.cursor, to));
                self.cursor = to;
            }
            "scale" => {
                let factor = int_arg(args, 0, "factor")?;
                if factor == 0 {
                    return Err("scale factor must be non-zero".into());
                }
                self.factor = factor;
            }
            "label" => {
                let text = args
                    .get(0, "text")
                    .and_then(Value::as_str)
                    .ok_or("text must be a string")?;
                let size = match args.get(1, "size") {
                    Some(_) => int_arg(args, 1, "size")?,
                    None => 12,
                };
                self.labels.push((text.to_string(), size));
            }
            "style" => {
                for (key, value) in &args.keyword {
                    self.style.push((key.clone(), value.clone()));
                }
            }
            other => return Err(format!("Sketch has no operation {other}").into()),
        }
        Ok(())
    }
}

fn recorded_sketch_class() -> Arc<RecordedClass> {
    let class = RecordedClass::builder("RecordedSketch")
        .check("scale", |name, args, sig| {
            if let Some(factor) = args.get(0, "factor") {
                if !factor.is_i64() {
                    return Err(CallError::Rejected {
                        operation: name.to_string(),
                        reason: "factor must be an integer".to_string(),
                    });
                }
            }
            recorded_object::check_call(name, args, sig)
        })
        .build();
    class.bind::<Sketch>().expect("bind Sketch");
    class
}

fn materialize(obj: &RecordedObject) -> Sketch {
    let mut target = Sketch::new();
    obj.replay(&mut target).expect("replay");
    target
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[test]
fn binding_proxies_public_operations_only() {
    let class = recorded_sketch_class();
    let descriptor = class.descriptor().expect("bound");
    let ops: Vec<&str> = descriptor.operations().collect();
    assert_eq!(ops, vec!["label", "line_to", "move_to", "scale", "style"]);
    assert_eq!(
        descriptor.get("move_to").and_then(|e| e.doc()),
        Some("Move the cursor without drawing.")
    );
    assert!(descriptor
        .get("scale")
        .is_some_and(|entry| entry.has_custom_validator()));
}

#[test]
fn replay_matches_live_execution() {
    let class = recorded_sketch_class();
    let mut obj = class.new_instance();
    obj.call("move_to", Arguments::new().arg(1).arg(1)).expect("test");
    obj.call("scale", Arguments::new().kwarg("factor", 2)).expect("test");
    obj.call("line_to", Arguments::new().arg(3).kwarg("y", 4)).expect("test");
    obj.call("label", Arguments::new().arg("corner")).expect("test");
    obj.call("style", Arguments::new().kwarg("color", "red")).expect("test");

    let mut live = Sketch::new();
    live.invoke("move_to", &Arguments::new().arg(1).arg(1)).expect("test");
    live.invoke("scale", &Arguments::new().kwarg("factor", 2)).expect("test");
    live.invoke("line_to", &Arguments::new().arg(3).kwarg("y", 4)).expect("test");
    live.invoke("label", &Arguments::new().arg("corner")).expect("test");
    live.invoke("style", &Arguments::new().kwarg("color", "red")).expect("test");

    assert_eq!(materialize(&obj), live);
    assert_eq!(live.segments, vec![((1, 1), (6, 8))]);
    assert_eq!(live.labels, vec![("corner".to_string(), 12)]);
}

#[test]
fn duplicate_then_replay_equals_original_replay() {
    let class = recorded_sketch_class();
    let mut original = class.new_instance();
    original.call("move_to", Arguments::new().arg(0).arg(0)).expect("test");
    original.call("line_to", Arguments::new().arg(5).arg(0)).expect("test");
    original.call("line_to", Arguments::new().arg(5).arg(5)).expect("test");

    let copy = original.duplicate();
    assert_eq!(copy.calls().fingerprint(), original.calls().fingerprint());
    assert_eq!(materialize(&copy), materialize(&original));
}

#[test]
fn duplicates_diverge_independently() {
    let class = recorded_sketch_class();
    let mut original = class.new_instance();
    original.call("move_to", Arguments::new().arg(2).arg(2)).expect("test");

    let mut copy = original.clone();
    copy.call("line_to", Arguments::new().arg(4).arg(4)).expect("test");

    assert!(materialize(&original).segments.is_empty());
    assert_eq!(materialize(&copy).segments, vec![((2, 2), (4, 4))]);
    assert_ne!(copy.calls().fingerprint(), original.calls().fingerprint());
}

#[test]
fn replay_preserves_recording_order() {
    let class = recorded_sketch_class();
    let record = |order: &[(&str, Arguments)]| {
        let mut obj = class.new_instance();
        for (op, args) in order {
            obj.call(op, args.clone()).expect("record");
        }
        materialize(&obj)
    };
    let scale = ("scale", Arguments::new().arg(3));
    let line = ("line_to", Arguments::new().arg(1).arg(1));

    let scale_first = record(&[scale.clone(), line.clone()]);
    let line_first = record(&[line.clone(), scale.clone()]);
    let scale_first_again = record(&[scale, line]);

    assert_ne!(scale_first, line_first);
    assert_eq!(scale_first, scale_first_again);
    assert_eq!(scale_first.segments, vec![((0, 0), (3, 3))]);
    assert_eq!(line_first.segments, vec![((0, 0), (1, 1))]);
}

#[test]
fn replay_failure_identifies_the_call_and_stops() {
    let class = recorded_sketch_class();
    let mut obj = class.new_instance();
    obj.call("move_to", Arguments::new().arg(7).arg(9)).expect("test");
    // Passes validation; only the real target knows zero is invalid.
    obj.call("scale", Arguments::new().arg(0)).expect("test");
    obj.call("line_to", Arguments::new().arg(1).arg(1)).expect("test");

    let mut target = Sketch::new();
    let err = obj.replay(&mut target).expect_err("scale(0) fails");
    assert_eq!(err.index, 1);
    assert_eq!(err.operation(), "scale");
    assert_eq!(err.call.args, Arguments::new().arg(0));
    assert_eq!(err.source.to_string(), "scale factor must be non-zero");
    assert_eq!(
        err.to_string(),
        "replay failed on scale() (call #1): scale factor must be non-zero"
    );

    assert_eq!(target.cursor, (7, 9));
    assert_eq!(target.factor, 1);
    assert!(target.segments.is_empty());
}

#[test]
fn custom_validator_rejects_before_recording() {
    let class = recorded_sketch_class();
    let mut obj = class.new_instance();
    let err = obj
        .call("scale", Arguments::new().arg("big"))
        .expect_err("non-integer factor");
    assert!(matches!(err, CallError::Rejected { .. }));

    let err = obj
        .call("scale", Arguments::new().arg(1).arg(2))
        .expect_err("too many");
    assert!(matches!(err, CallError::ArityMismatch { .. }));
    assert!(obj.calls().is_empty());
}

#[test]
fn private_and_property_attributes_are_not_callable() {
    let class = recorded_sketch_class();
    let mut obj = class.new_instance();
    for name in ["_flush", "bounds"] {
        let err = obj.call(name, Arguments::new()).expect_err("not proxied");
        assert!(matches!(err, CallError::UnknownOperation { .. }));
    }
}
