// Copyright (c) 2026 clusterscope developers.
// All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! This module contains a collection of matchers

pub use googletest::matchers::*;

use clusterscope_types::Verdict;
use googletest::matcher::Matcher;

/// Matches a [`Verdict`] that is [`Verdict::Good`].
pub fn good() -> impl Matcher<ActualT = Verdict> {
    eq(Verdict::Good)
}

/// Matches a [`Verdict`] that is [`Verdict::Bad`].
pub fn bad() -> impl Matcher<ActualT = Verdict> {
    eq(Verdict::Bad)
}
