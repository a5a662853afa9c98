#![no_main]

use libfuzzer_sys::fuzz_target;
use mock_override::contract::validate;
use mock_override::{ArgType, Argument, ArityPolicy};

const INT: u32 = 1;
const TEXT: &str = "text";
const FLAG: bool = true;

fn argument(byte: u8) -> Argument<'static> {
    match byte % 3 {
        0 => Argument::of(&INT),
        1 => Argument::of(&TEXT),
        _ => Argument::of(&FLAG),
    }
}

fn arg_type(byte: u8) -> ArgType {
    match byte % 3 {
        0 => ArgType::of::<u32>(),
        1 => ArgType::of::<&'static str>(),
        _ => ArgType::of::<bool>(),
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (supplied, declared) = rest.split_at(split);

    let args: Vec<Argument<'static>> = supplied.iter().copied().map(argument).collect();
    let expected: Vec<ArgType> = declared.iter().copied().map(arg_type).collect();

    for policy in [ArityPolicy::AllowFewer, ArityPolicy::Exact] {
        if let Ok(taken) = validate(&args, &expected, policy) {
            assert_eq!(taken, expected.len());
            assert!(taken <= args.len());
        }
    }
});
