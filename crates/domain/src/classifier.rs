// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Category classification from tariff codes.
//!
//! Classification is a prefix lookup on the 2-digit tariff chapter. A code
//! whose chapter is not covered by any CBAM category is not an error: the
//! good is simply outside the mechanism's scope.

use crate::types::{CbamCategory, CommodityCode};

/// Classifies a commodity code into a CBAM category.
///
/// Takes the 2-digit chapter prefix and checks it against each category's
/// valid chapter set, in the fixed priority order of [`CbamCategory::ALL`].
/// Chapters are disjoint by construction; the priority order only matters if
/// a future amendment introduces a collision.
///
/// # Returns
///
/// * `Some(category)` if the chapter maps to a CBAM category
/// * `None` if the good is not covered by CBAM (a valid outcome, not a
///   failure)
#[must_use]
pub fn classify(code: &CommodityCode) -> Option<CbamCategory> {
    let chapter: &str = code.chapter();
    if chapter.is_empty() {
        return None;
    }
    CbamCategory::ALL
        .into_iter()
        .find(|category| category.valid_chapters().contains(&chapter))
}
