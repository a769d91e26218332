#![no_main]

use std::collections::HashMap;

use arbor::data::Variable;
use arbor::{format, parse};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: &str| {
    let variables: HashMap<String, u64> = ["x", "y", "z"]
        .iter()
        .map(|n| ((*n).to_string(), Variable::hash_name(n)))
        .collect();

    // Parsing must never panic; errors are fine.
    let Ok(tree) = parse::parse(input, &variables) else {
        return;
    };

    // Overflowing literals (1e999) format as "inf", which is not parser
    // input; skip those.
    let finite = tree
        .nodes()
        .iter()
        .all(|n| !matches!(n, arbor::Node::Constant(c) if !c.is_finite()));
    if !finite {
        return;
    }

    // Anything that parses must format and re-parse to the same structure.
    let names: HashMap<u64, String> = variables.iter().map(|(n, h)| (*h, n.clone())).collect();
    let text = format::infix(&tree, &names, 6).expect("parsed tree must format");
    let reparsed = parse::parse(&text, &variables).expect("formatted output must parse");
    assert_eq!(tree.len(), reparsed.len());
});
