use crate::error::{Result, SurveyError};
use crate::types::{LoadReport, PerMetric, RawRow, Segment, SurveyRecord};
use crate::util::{clean_text, parse_rating, parse_timestamp_safe};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Long-form survey questions, in canonical form (see [`canonical_header`]),
/// mapped to their short column keys.
const QUESTION_HEADERS: [(&str, &str); 5] = [
    (
        "En general ¿La información suministrada en nuestros canales de atención fue clara y fácil de comprender?",
        "claridad_informacion",
    ),
    (
        "¿Qué tan probable es que usted le recomiende Coltefinanciera a sus colegas familiares o amigos?",
        "recomendacion",
    ),
    (
        "En general ¿Qué tan satisfecho se encuentra con los servicios que le ofrece Coltefinanciera?",
        "satisfaccion_general",
    ),
    (
        "Asumiendo que otra entidad financiera le ofreciera al mismo precio los mismos productos y servicios que usted tiene actualmente con Coltefinanciera ¿Qué tan probable es que usted continúe siendo cliente de Coltefinanciera?",
        "lealtad",
    ),
    (
        "¿Tiene alguna recomendación o sugerencia acerca del servicio que le ofrecemos en Coltefinanciera?",
        "sugerencias",
    ),
];

const ADMIN_HEADERS: [(&str, &str); 3] = [
    ("TIPO EJECUTIVO", "TIPO_EJECUTIVO"),
    ("EJECUTIVO FINAL", "EJECUTIVO_FINAL"),
    ("DATE MODIFIED", "DATE_MODIFIED"),
];

// Exports write the question commas either as commas or as runs of spaces.
fn canonical_header(header: &str) -> String {
    header
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map a raw header to its column key. Unknown headers come back trimmed.
pub fn normalize_header(header: &str) -> String {
    let trimmed = header.trim_start_matches('\u{feff}').trim();
    let canonical = canonical_header(trimmed);
    if let Some((_, key)) = QUESTION_HEADERS.iter().find(|(q, _)| *q == canonical) {
        return key.to_string();
    }
    if let Some((_, key)) = ADMIN_HEADERS.iter().find(|(h, _)| *h == trimmed) {
        return key.to_string();
    }
    trimmed.to_string()
}

/// Parse a delimited survey export into records.
///
/// Rows without an ID, without a segment or without any rating in `1..=5`
/// are dropped and counted in the returned [`LoadReport`]; they never fail
/// the load. Only a reader-level failure (e.g. unreadable header) is an error.
pub fn parse_records<R: Read>(input: R, delimiter: u8) -> Result<(Vec<SurveyRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(input);

    let raw_headers = rdr.headers()?.clone();
    let mut headers = StringRecord::new();
    for h in raw_headers.iter() {
        let key = normalize_header(h);
        if key != h.trim() {
            debug!(from = h.trim(), to = %key, "header mapped");
        }
        headers.push_field(&key);
    }
    rdr.set_headers(headers);

    let mut report = LoadReport::default();
    let mut records: Vec<SurveyRecord> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(error = %e, "row skipped");
                report.parse_errors += 1;
                continue;
            }
        };

        let id = clean_text(row.id.as_deref());
        if id.is_empty() {
            report.missing_id += 1;
            continue;
        }
        let segment_raw = clean_text(row.segmento.as_deref());
        if segment_raw.is_empty() {
            report.missing_segment += 1;
            continue;
        }

        let ratings = PerMetric {
            clarity: parse_rating(row.claridad_informacion.as_deref()),
            recommendation: parse_rating(row.recomendacion.as_deref()),
            satisfaction: parse_rating(row.satisfaccion_general.as_deref()),
            loyalty: parse_rating(row.lealtad.as_deref()),
        };
        let record = SurveyRecord {
            id,
            date_modified: clean_text(row.date_modified.as_deref()),
            responded_at: parse_timestamp_safe(row.date_modified.as_deref()),
            segment: Segment::from_raw(&segment_raw),
            city: clean_text(row.ciudad.as_deref()),
            agency: clean_text(row.agencia.as_deref()),
            executive_type: clean_text(row.tipo_ejecutivo.as_deref()),
            executive: clean_text(row.ejecutivo.as_deref()),
            executive_final: clean_text(row.ejecutivo_final.as_deref()),
            ratings,
            suggestion: row
                .sugerencias
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        };
        if !record.has_any_rating() {
            report.no_valid_metric += 1;
            continue;
        }
        records.push(record);
    }

    report.valid_rows = records.len();
    info!(
        total = report.total_rows,
        valid = report.valid_rows,
        dropped = report.dropped_rows(),
        "survey rows parsed"
    );
    if report.valid_rows == 0 && report.total_rows > 0 {
        warn!("no valid survey records found");
    }
    Ok((records, report))
}

pub fn parse_str(text: &str, delimiter: u8) -> Result<(Vec<SurveyRecord>, LoadReport)> {
    parse_records(text.as_bytes(), delimiter)
}

pub fn load_from_path<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
) -> Result<(Vec<SurveyRecord>, LoadReport)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SurveyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading survey export");
    parse_records(file, delimiter)
}
