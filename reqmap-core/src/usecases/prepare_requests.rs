use super::prelude::*;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

const DATE_TIME_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[day].[month].[year] [hour]:[minute]:[second]"),
    format_description!("[day].[month].[year] [hour]:[minute]"),
];

// RFC 3339 requires a `T` between date and time.
const OFFSET_DATE_TIME_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
    ),
    format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
    ),
];

const DATE_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]"),
    format_description!("[day].[month].[year]"),
];

/// Statistics about the rows that have been excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareReport {
    pub total: usize,
    pub prepared: usize,
    pub missing_address: usize,
    pub invalid_timestamp: usize,
    pub invalid_count: usize,
}

impl PrepareReport {
    pub fn excluded(&self) -> usize {
        self.missing_address + self.invalid_timestamp + self.invalid_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Defect {
    MissingAddress,
    InvalidTimestamp,
    InvalidCount,
}

/// Turns raw rows into service requests.
///
/// Defective rows are excluded and counted, they never abort the batch.
pub fn prepare_requests<I>(rows: I) -> (Vec<ServiceRequest>, PrepareReport)
where
    I: IntoIterator<Item = RawServiceRequest>,
{
    let mut report = PrepareReport::default();
    let mut requests = vec![];
    for (index, row) in rows.into_iter().enumerate() {
        report.total += 1;
        match prepare_request(row) {
            Ok(req) => requests.push(req),
            Err((defect, row)) => {
                log::debug!("Excluding row #{index} ({defect:?}): {row:?}");
                match defect {
                    Defect::MissingAddress => report.missing_address += 1,
                    Defect::InvalidTimestamp => report.invalid_timestamp += 1,
                    Defect::InvalidCount => report.invalid_count += 1,
                }
            }
        }
    }
    report.prepared = requests.len();
    if report.excluded() > 0 {
        log::warn!(
            "Excluded {} of {} rows (address: {}, timestamp: {}, count: {})",
            report.excluded(),
            report.total,
            report.missing_address,
            report.invalid_timestamp,
            report.invalid_count
        );
    }
    (requests, report)
}

fn prepare_request(
    row: RawServiceRequest,
) -> std::result::Result<ServiceRequest, (Defect, RawServiceRequest)> {
    let (Some(street), Some(house)) = (non_blank(&row.street), non_blank(&row.house)) else {
        return Err((Defect::MissingAddress, row));
    };
    let Some(created_at) = non_blank(&row.created_at).and_then(parse_timestamp) else {
        return Err((Defect::InvalidTimestamp, row));
    };
    let count = match non_blank(&row.count) {
        None => 0,
        Some(count) => match parse_count(count) {
            Some(count) => count,
            None => return Err((Defect::InvalidCount, row)),
        },
    };
    let category = non_blank(&row.category)
        .unwrap_or(UNSPECIFIED_CATEGORY)
        .to_owned();
    let address = Address::new(street, normalize_house_number(house));
    Ok(ServiceRequest {
        address,
        category,
        created_at,
        count,
        pos: None,
    })
}

fn non_blank(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_timestamp(s: &str) -> Option<PrimitiveDateTime> {
    let s = s.trim();
    // Keep the wall-clock time of the export, the offset only decorates it.
    let with_offset = OffsetDateTime::parse(s, &Rfc3339).ok().or_else(|| {
        OFFSET_DATE_TIME_FORMATS
            .iter()
            .find_map(|fmt| OffsetDateTime::parse(s, fmt).ok())
    });
    if let Some(dt) = with_offset {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| PrimitiveDateTime::parse(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| Date::parse(s, fmt).ok())
                .map(Date::midnight)
        })
}

// Spreadsheet exports tend to turn integer columns into floats.
fn parse_count(s: &str) -> Option<u64> {
    if let Ok(count) = s.parse::<u64>() {
        return Some(count);
    }
    let count = s.parse::<f64>().ok()?;
    (count.is_finite() && count >= 0.0 && count.fract() == 0.0 && count <= u64::MAX as f64)
        .then_some(count as u64)
}

fn normalize_house_number(house: &str) -> &str {
    match house.split_once('.') {
        Some((int, fract))
            if !int.is_empty()
                && int.chars().all(|c| c.is_ascii_digit())
                && !fract.is_empty()
                && fract.chars().all(|c| c == '0') =>
        {
            int
        }
        _ => house,
    }
}
