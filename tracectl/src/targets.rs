// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Link-time registry of tracing targets across all linked crates

use crate::LevelFilter;
use linkme::distributed_slice;

/// A statically declared tracing target
pub struct STarget {
    pub(crate) target: &'static str,
    pub(crate) name: &'static str,
    pub(crate) level: LevelFilter,
    pub(crate) tags: &'static [&'static str],
}

impl STarget {
    #[must_use]
    pub const fn new(
        target: &'static str,
        name: &'static str,
        level: LevelFilter,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            target,
            name,
            level,
            tags,
        }
    }
}

#[distributed_slice]
pub static TRACING_TARGETS: [STarget];

#[macro_export]
/// Declare the tracing target of the calling module: its name, default level and tags.
///
/// The name is also usable as a tag.
macro_rules! trace_target {
    // The output lives in its own const scope so that the macro can be invoked in several
    // modules without the statics' names colliding.
    ($name:expr, $level:expr, $tags:expr) => {
        const _: () = {
            use $crate::LevelFilter;
            use $crate::targets::{STarget, TRACING_TARGETS};
            use linkme::distributed_slice;

            #[distributed_slice(TRACING_TARGETS)]
            static TRACE_TGT: STarget = STarget::new(module_path!(), $name, $level, $tags);
        };
    };
}
