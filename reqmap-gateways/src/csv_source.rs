use reqmap_core::{
    entities::RawServiceRequest,
    gateways::source::{Error, RequestSource},
};
use std::{fs::File, io, path::PathBuf};

/// Header names of the columns.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub street     : String,
    pub house      : String,
    pub count      : String,
    pub created_at : String,
    pub category   : String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            street: "Улица".into(),
            house: "Дом".into(),
            count: "Всего".into(),
            created_at: "created_at".into(),
            category: "category".into(),
        }
    }
}

/// Reads service requests from a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvRequestSource {
    path: PathBuf,
    columns: Columns,
}

impl CsvRequestSource {
    pub fn new<P: Into<PathBuf>>(path: P, columns: Columns) -> Self {
        Self {
            path: path.into(),
            columns,
        }
    }
}

impl RequestSource for CsvRequestSource {
    fn load_requests(&self) -> Result<Vec<RawServiceRequest>, Error> {
        let file = File::open(&self.path)
            .map_err(|err| Error::Unavailable(format!("{}: {err}", self.path.display())))?;
        let requests = read_requests(file, &self.columns)?;
        log::info!(
            "Read {} service requests from {}",
            requests.len(),
            self.path.display()
        );
        Ok(requests)
    }
}

fn csv_error(err: csv::Error) -> Error {
    Error::Other(err.into())
}

pub fn read_requests<R: io::Read>(
    reader: R,
    columns: &Columns,
) -> Result<Vec<RawServiceRequest>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name.trim());
    let required = |name: &str| position(name).ok_or_else(|| Error::MissingColumn(name.to_owned()));
    let optional = |name: &str| {
        let pos = position(name);
        if pos.is_none() {
            log::warn!("Missing column '{name}'");
        }
        pos
    };

    let street = required(&columns.street)?;
    let house = required(&columns.house)?;
    let created_at = required(&columns.created_at)?;
    let count = optional(&columns.count);
    let category = optional(&columns.category);

    let mut requests = vec![];
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                log::warn!("Skipping unreadable record #{index}: {err}");
                continue;
            }
        };
        let cell = |pos: Option<usize>| {
            pos.and_then(|pos| record.get(pos))
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned)
        };
        requests.push(RawServiceRequest {
            street: cell(Some(street)),
            house: cell(Some(house)),
            category: cell(category),
            created_at: cell(Some(created_at)),
            count: cell(count),
        });
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Columns {
        Columns {
            street: "street".into(),
            house: "house".into(),
            count: "total".into(),
            created_at: "created_at".into(),
            category: "category".into(),
        }
    }

    #[test]
    fn read_rows_with_empty_cells() {
        let csv = "\
created_at,street, house ,category,total,comment
2025-06-01 10:00:00,Ленина,12,water,3,x
2025-06-02 11:00:00, ,,,,
";
        let rows = read_requests(csv.as_bytes(), &columns()).unwrap();
        assert_eq!(2, rows.len());
        assert_eq!(
            RawServiceRequest {
                street: Some("Ленина".into()),
                house: Some("12".into()),
                category: Some("water".into()),
                created_at: Some("2025-06-01 10:00:00".into()),
                count: Some("3".into()),
            },
            rows[0]
        );
        assert_eq!(
            RawServiceRequest {
                created_at: Some("2025-06-02 11:00:00".into()),
                ..Default::default()
            },
            rows[1]
        );
    }

    #[test]
    fn tolerate_short_rows_and_missing_optional_columns() {
        let csv = "street,house,created_at\nA,1\n";
        let rows = read_requests(csv.as_bytes(), &columns()).unwrap();
        assert_eq!(1, rows.len());
        assert_eq!(Some("A".to_string()), rows[0].street);
        assert_eq!(None, rows[0].created_at);
        assert_eq!(None, rows[0].count);
    }

    #[test]
    fn missing_required_column() {
        let csv = "street,created_at\nA,2025-06-01\n";
        let err = read_requests(csv.as_bytes(), &columns()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(name) if name == "house"));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvRequestSource::new(dir.path().join("missing.csv"), columns());
        assert!(matches!(
            source.load_requests(),
            Err(Error::Unavailable(_))
        ));
    }

    #[test]
    fn load_from_file_with_default_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.csv");
        std::fs::write(
            &path,
            "Улица,Дом,Всего,created_at,category\nЛенина,12,3,2025-06-01,вода\n",
        )
        .unwrap();
        let rows = CsvRequestSource::new(path, Columns::default())
            .load_requests()
            .unwrap();
        assert_eq!(1, rows.len());
        assert_eq!(Some("вода".to_string()), rows[0].category);
    }
}
