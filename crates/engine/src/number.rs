// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report number synthesis.
//!
//! Report numbers are human-readable handles, not primary keys. A timestamp
//! plus a short random suffix keeps them unique enough for operator use; the
//! database identity is the UUID.

use time::OffsetDateTime;

fn compact_timestamp(now: OffsetDateTime) -> String {
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Synthesizes a report number, e.g. `CBAM-20240115103000-A1B2`.
#[must_use]
pub fn report_number(now: OffsetDateTime) -> String {
    format!(
        "CBAM-{}-{:04X}",
        compact_timestamp(now),
        rand::random::<u16>()
    )
}

/// Synthesizes a merged report number, e.g. `CBAM-MERGED-20240115103000`.
#[must_use]
pub fn merged_report_number(now: OffsetDateTime) -> String {
    format!("CBAM-MERGED-{}", compact_timestamp(now))
}
