//! Dependency graph in diamond shape. `a` feeds two sums but shows up once in the diagram.

use micrograph::{draw_dot, trace, Value};

fn main() -> micrograph::Result<()> {
    let a = Value::new(1.).with_label("a");
    let b = Value::new(3.).with_label("b");
    let c = Value::new(5.).with_label("c");
    let ab = (&a + &b).with_label("ab");
    let ac = (&a * &c).with_label("ac");
    let abac = (&ab + &ac).with_label("abac");

    let graph = trace(&abac);
    eprintln!("nodes: {}, edges: {}", graph.nodes().len(), graph.edges().len());

    draw_dot(&abac).write_dot(&mut std::io::stdout())?;
    Ok(())
}
