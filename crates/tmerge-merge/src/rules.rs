//! Per-dialect tag tables.
//!
//! Every tag the engines treat specially maps to a [`TagRule`]: how two
//! elements with that tag are recognised as the same entity, and which
//! attribute reconciliation steps run once they have been merged. Tags that
//! are not listed fall back to [`OTHER`], a singleton rule with no steps.
//!
//! Lookups compare tag names ASCII case-insensitively.

use std::fmt;

/// Report format whose rules apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Tree-structured NUnit 2.x `test-results` documents.
    NUnit,
    /// Visual Studio TRX execution logs.
    Trx,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::NUnit => f.write_str("nunit"),
            Dialect::Trx => f.write_str("trx"),
        }
    }
}

/// Logical element kind behind a tag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    ReportRoot,
    Suite,
    Case,
    UnitTestResult,
    UnitTest,
    Execution,
    TestMethod,
    TestEntry,
    TestList,
    Times,
    Counters,
    Other,
}

/// How two same-tag elements are recognised as the same entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Identity {
    /// Any two elements with the tag match (singleton per parent).
    Always,
    /// Every listed attribute must hold the same value on both sides.
    Attributes(&'static [&'static str]),
}

/// One reconciliation step, applied to the destination element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    SumInt(&'static str),
    SumFloat(&'static str),
    Min(&'static str),
    Max(&'static str),
    /// Replace the destination value with the source value while the
    /// destination still holds `recessive`.
    OverrideIfDefault {
        attribute: &'static str,
        recessive: &'static str,
    },
}

/// Identity predicate plus reconciliation steps for one tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagRule {
    pub kind: TagKind,
    pub identity: Identity,
    pub steps: &'static [Step],
}

/// Rule for every tag without an entry in the dialect table.
pub static OTHER: TagRule = TagRule {
    kind: TagKind::Other,
    identity: Identity::Always,
    steps: &[],
};

const NUNIT_TOTALS: &[Step] = &[
    Step::SumInt("total"),
    Step::SumInt("errors"),
    Step::SumInt("failures"),
    Step::SumInt("not-run"),
    Step::SumInt("inconclusive"),
    Step::SumInt("ignored"),
    Step::SumInt("skipped"),
    Step::SumInt("invalid"),
    Step::Min("date"),
    Step::Min("time"),
];

// A merged suite or case keeps its passing value only while every part passed.
const NUNIT_OUTCOME: &[Step] = &[
    Step::OverrideIfDefault {
        attribute: "executed",
        recessive: "True",
    },
    Step::OverrideIfDefault {
        attribute: "result",
        recessive: "Success",
    },
    Step::OverrideIfDefault {
        attribute: "success",
        recessive: "True",
    },
    Step::SumFloat("time"),
    Step::SumInt("asserts"),
];

static NUNIT_RULES: &[(&str, TagRule)] = &[
    (
        "test-results",
        TagRule {
            kind: TagKind::ReportRoot,
            identity: Identity::Always,
            steps: NUNIT_TOTALS,
        },
    ),
    (
        "test-suite",
        TagRule {
            kind: TagKind::Suite,
            identity: Identity::Attributes(&["name", "type"]),
            steps: NUNIT_OUTCOME,
        },
    ),
    (
        "test-case",
        TagRule {
            kind: TagKind::Case,
            identity: Identity::Attributes(&["name"]),
            steps: NUNIT_OUTCOME,
        },
    ),
];

const TRX_TIMES: &[Step] = &[
    Step::Min("creation"),
    Step::Min("queuing"),
    Step::Min("start"),
    Step::Max("finish"),
];

/// Counter attributes of a TRX `ResultSummary/Counters` element.
pub const TRX_COUNTERS: [&str; 16] = [
    "total",
    "executed",
    "passed",
    "failed",
    "error",
    "timeout",
    "aborted",
    "inconclusive",
    "passedButRunAborted",
    "notRunnable",
    "notExecuted",
    "disconnected",
    "warning",
    "completed",
    "inProgress",
    "pending",
];

// Every counter is summed.
const TRX_COUNTER_STEPS: [Step; TRX_COUNTERS.len()] = {
    let mut steps = [Step::SumInt(""); TRX_COUNTERS.len()];
    let mut i = 0;
    while i < TRX_COUNTERS.len() {
        steps[i] = Step::SumInt(TRX_COUNTERS[i]);
        i += 1;
    }
    steps
};

static TRX_RULES: &[(&str, TagRule)] = &[
    (
        "UnitTestResult",
        TagRule {
            kind: TagKind::UnitTestResult,
            identity: Identity::Attributes(&["testId", "testName", "executionId"]),
            steps: &[],
        },
    ),
    (
        "UnitTest",
        TagRule {
            kind: TagKind::UnitTest,
            identity: Identity::Attributes(&["id"]),
            steps: &[],
        },
    ),
    (
        "Execution",
        TagRule {
            kind: TagKind::Execution,
            identity: Identity::Attributes(&["id"]),
            steps: &[],
        },
    ),
    (
        "TestMethod",
        TagRule {
            kind: TagKind::TestMethod,
            identity: Identity::Attributes(&["codeBase", "className", "name"]),
            steps: &[],
        },
    ),
    (
        "TestEntry",
        TagRule {
            kind: TagKind::TestEntry,
            identity: Identity::Attributes(&["testId", "executionId"]),
            steps: &[],
        },
    ),
    (
        "TestList",
        TagRule {
            kind: TagKind::TestList,
            identity: Identity::Attributes(&["id"]),
            steps: &[],
        },
    ),
    (
        "Times",
        TagRule {
            kind: TagKind::Times,
            identity: Identity::Always,
            steps: TRX_TIMES,
        },
    ),
    (
        "Counters",
        TagRule {
            kind: TagKind::Counters,
            identity: Identity::Always,
            steps: &TRX_COUNTER_STEPS,
        },
    ),
];

/// Resolve the rule for `tag` in `dialect`.
pub fn rule_for(dialect: Dialect, tag: &str) -> &'static TagRule {
    let table = match dialect {
        Dialect::NUnit => NUNIT_RULES,
        Dialect::Trx => TRX_RULES,
    };
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tag))
        .map(|(_, rule)| rule)
        .unwrap_or(&OTHER)
}
