#![allow(dead_code)]

use mock_override::{ArgType, Argument};
use proptest::prelude::*;

/// A runtime value of one of a few argument types.
#[derive(Debug, Clone)]
pub enum Sample {
    Int(u32),
    Text(String),
    Flag(bool),
    Maybe(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Text,
    Flag,
    Maybe,
}

impl Sample {
    pub fn kind(&self) -> Kind {
        match self {
            Sample::Int(_) => Kind::Int,
            Sample::Text(_) => Kind::Text,
            Sample::Flag(_) => Kind::Flag,
            Sample::Maybe(_) => Kind::Maybe,
        }
    }

    pub fn as_argument(&self) -> Argument<'_> {
        match self {
            Sample::Int(v) => Argument::of(v),
            Sample::Text(v) => Argument::of(v),
            Sample::Flag(v) => Argument::of(v),
            Sample::Maybe(v) => Argument::of(v),
        }
    }
}

impl Kind {
    pub fn arg_type(self) -> ArgType {
        match self {
            Kind::Int => ArgType::of::<u32>(),
            Kind::Text => ArgType::of::<String>(),
            Kind::Flag => ArgType::of::<bool>(),
            Kind::Maybe => ArgType::of::<Option<String>>(),
        }
    }
}

pub fn sample() -> impl Strategy<Value = Sample> {
    prop_oneof![
        any::<u32>().prop_map(Sample::Int),
        any::<String>().prop_map(Sample::Text),
        any::<bool>().prop_map(Sample::Flag),
        proptest::option::of(any::<String>()).prop_map(Sample::Maybe),
    ]
}

pub fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Int),
        Just(Kind::Text),
        Just(Kind::Flag),
        Just(Kind::Maybe),
    ]
}
