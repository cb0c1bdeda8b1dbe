#![allow(dead_code)]

pub const FEBRUARY_2026: (i32, u32) = (2026, 2);

pub const IVE_COMEBACK_DATE: &str = "2026-02-15";
pub const GD_CONCERT_DATE: &str = "2026-02-06";
pub const BUSY_DAY_DATE: &str = "2026-02-09";
pub const NMIXX_FANSIGN_DATE: &str = "2026-02-20";
pub const EMPTY_DAY_DATE: &str = "2026-02-10";

pub const IVE_ID: i64 = 1;
pub const GD_ID: i64 = 2;
pub const LNGSHOT_ID: i64 = 3;
pub const BTS_ACTIVITY_ID: i64 = 4;
pub const SEVENTEEN_ID: i64 = 5;
pub const AESPA_FANSIGN_ID: i64 = 6;
pub const NMIXX_FANSIGN_ID: i64 = 7;
