// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use crate::CreateReportRequest;
use cbam_domain::FactorTable;
use cbam_engine::{DeclarantDetails, InstallationDetails};
use cbam_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn table() -> FactorTable {
    FactorTable::eu_defaults()
}

pub fn store() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn now() -> OffsetDateTime {
    datetime!(2024-03-15 10:30:00 UTC)
}

pub fn steel_request() -> CreateReportRequest {
    CreateReportRequest {
        commodity_code: String::from("73181500"),
        product_description: String::from("Threaded steel fasteners"),
        category: None,
        quantity: None,
        quantity_unit: None,
        net_weight_kg: 5000.0,
        country_of_origin: String::from("IN"),
        reporting_period: String::from("2024-Q1"),
        declarant: DeclarantDetails {
            eori: String::from("DE123456789012345"),
            name: String::from("German Steel Imports GmbH"),
            street: String::from("Industriestrasse 42"),
            city: String::from("Duesseldorf"),
            postal_code: String::from("40210"),
            country: String::from("DE"),
        },
        installation: InstallationDetails {
            identifier: Some(String::from("IN-JSR-001")),
            name: String::from("Jamshedpur Works"),
            country: String::from("IN"),
            address: Some(String::from("Jamshedpur, Jharkhand")),
        },
        measured_direct_tco2: None,
        measured_indirect_tco2: None,
        electricity_mwh: None,
    }
}

pub fn cement_request() -> CreateReportRequest {
    CreateReportRequest {
        commodity_code: String::from("25232900"),
        product_description: String::from("Portland cement, grey"),
        installation: InstallationDetails {
            identifier: Some(String::from("IN-GUJ-002")),
            name: String::from("Gujarat Cement Plant"),
            country: String::from("IN"),
            address: None,
        },
        ..steel_request()
    }
}
