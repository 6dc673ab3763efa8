//! Builds a chain of words, edits it, then closes it into a circle.
//!
//! Run with `RUST_LOG=nodechain=trace` to see every link change.

use nodechain::{NodeArena, NodeError};
use tracing_subscriber::EnvFilter;

fn print_line<'a>(words: impl Iterator<Item = &'a str>) {
    println!("{}", words.collect::<Vec<_>>().join(" "));
}

fn main() -> Result<(), NodeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut arena = NodeArena::new();
    let words = ["the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog"];

    let root = arena.create(words[0]);
    for word in &words[1..] {
        let n = arena.create(*word);
        let tail = arena.tail(root)?.unwrap_or(root);
        arena.insert_after(tail, n)?;
    }

    println!("Nodes in order:");
    print_line(arena.walk_forward(root)?.map(|(_, w)| *w));

    let one = arena.next(root)?.unwrap_or(root);
    let n = arena.next(one)?.unwrap_or(one);
    println!("two steps from root: {}", arena.value(n)?);
    arena.delete(n)?;

    let one = arena.next(root)?.unwrap_or(root);
    let n = arena.next(one)?.unwrap_or(one);
    println!("two steps from root after removal of 'brown': {}", arena.value(n)?);

    println!("Nodes in reverse order:");
    let tail = arena.tail(root)?.unwrap_or(root);
    print_line(arena.walk_backward(tail)?.map(|(_, w)| *w));

    let head = arena.head(root)?.unwrap_or(root);
    arena.join(tail, head)?;
    println!("Is root now a circular chain: {}", arena.is_circular(root)?);

    // Stops once every node has been seen.
    arena.visit_forward(head, |_, w| {
        print!("{w} ");
        true
    })?;
    println!();

    Ok(())
}
