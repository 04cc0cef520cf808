use micrograph::{Error, Operand, Value};
use proptest::prelude::*;

#[test]
fn leaf() {
    let a = Value::new(2.5);
    assert_eq!(a.data(), 2.5);
    assert_eq!(a.op(), "");
    assert_eq!(a.label(), "");
    assert_eq!(a.grad(), 0.);
    assert!(a.is_leaf());
    assert!(a.children().is_empty());
}

#[test]
fn labeled_product() {
    let x = Value::new(2.).with_label("x");
    let y = Value::new(3.).with_label("y");
    let z = (&x * &y).with_label("z");
    assert_eq!(z.data(), 6.);
    assert_eq!(z.op(), "*");
    assert_eq!(z.label(), "z");
    assert_eq!(z.children(), &[x, y]);
}

#[test]
fn result_does_not_inherit_label() {
    let a = Value::new(1.).with_label("a");
    let b = Value::new(2.).with_label("b");
    let c = &a + &b;
    assert_eq!(c.label(), "");
    assert_eq!(c.grad(), 0.);
}

#[test]
fn with_label_makes_new_node() {
    let a = Value::new(1.);
    let b = Value::new(2.);
    let c = &a + &b;
    let d = c.with_label("d");
    assert_ne!(c, d);
    assert!(!c.ptr_eq(&d));
    assert_eq!(c.label(), "");
    assert_eq!(d.data(), c.data());
    assert_eq!(d.op(), c.op());
    assert_eq!(d.children(), c.children());
}

#[test]
fn identity_not_structure() {
    let a = Value::new(1.);
    let b = Value::new(1.);
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_eq!(a.id(), a.clone().id());
}

#[test]
fn same_operand_twice() {
    let a = Value::new(1.5);
    let b = &a + &a;
    assert_eq!(b.data(), 3.);
    assert!(b.children()[0].ptr_eq(&a));
    assert!(b.children()[1].ptr_eq(&a));
}

#[test]
fn owned_operators() {
    let c = Value::from(2) * Value::from(4.0f32) + Value::from(1.);
    assert_eq!(c.data(), 9.);
    assert_eq!(c.op(), "+");
    assert_eq!(c.children()[0].op(), "*");
}

#[test]
fn try_ops_accept_values() {
    let a = Value::new(2.);
    let b = Value::new(5.);
    let sum = a.try_add(&b).unwrap();
    assert_eq!(sum.data(), 7.);
    assert_eq!(sum.children(), &[a.clone(), b.clone()]);
    let prod = a.try_mul(Operand::Value(b)).unwrap();
    assert_eq!(prod.data(), 10.);
    assert_eq!(prod.op(), "*");
}

#[test]
fn try_ops_reject_scalars() {
    let a = Value::new(2.);
    assert!(matches!(a.try_add(1.), Err(Error::InvalidOperand { .. })));
    let err = a.try_mul(3.).unwrap_err();
    assert!(matches!(err, Error::InvalidOperand { found: "f64" }));
    assert!(err
        .to_string()
        .starts_with("Operands must be instances of Value"));
}

#[test]
fn display() {
    assert_eq!(Value::new(2.).to_string(), "Value(data=2.0, label=)");
    assert_eq!(
        Value::new(0.5).with_label("h").to_string(),
        "Value(data=0.5, label=h)"
    );
}

#[test]
fn display_special_floats() {
    let shown = |x: f64| Value::new(x).to_string();
    assert_eq!(shown(f64::NAN), "Value(data=nan, label=)");
    assert_eq!(shown(f64::INFINITY), "Value(data=inf, label=)");
    assert_eq!(shown(f64::NEG_INFINITY), "Value(data=-inf, label=)");
    assert_eq!(shown(1e20), "Value(data=1e+20, label=)");
    assert_eq!(shown(1e-5), "Value(data=1e-05, label=)");
    assert_eq!(shown(-2.5e-7), "Value(data=-2.5e-07, label=)");
    assert_eq!(shown(1e123), "Value(data=1e+123, label=)");
    assert_eq!(shown(123456.0), "Value(data=123456.0, label=)");
}

proptest! {
    #[test]
    fn prop_add(a in -1e6f64..1e6, b in -1e6f64..1e6) {
        let va = Value::new(a);
        let vb = Value::new(b);
        let c = &va + &vb;
        prop_assert_eq!(c.data(), a + b);
        prop_assert_eq!(c.op(), "+");
        prop_assert_eq!(c.children().len(), 2);
        prop_assert!(c.children()[0].ptr_eq(&va));
        prop_assert!(c.children()[1].ptr_eq(&vb));
    }

    #[test]
    fn prop_mul(a in -1e6f64..1e6, b in -1e6f64..1e6) {
        let c = Value::new(a) * Value::new(b);
        prop_assert_eq!(c.data(), a * b);
        prop_assert_eq!(c.op(), "*");
    }

    #[test]
    fn prop_with_label_keeps_receiver(a in -1e6f64..1e6, label in "[a-z]{0,8}") {
        let v = &Value::new(a) + &Value::new(1.);
        let w = v.with_label(label.clone());
        prop_assert!(!w.ptr_eq(&v));
        prop_assert_eq!(v.label(), "");
        prop_assert_eq!(w.label(), label.as_str());
        prop_assert_eq!(w.data(), v.data());
        prop_assert_eq!(w.op(), v.op());
        prop_assert_eq!(w.children(), v.children());
    }
}
