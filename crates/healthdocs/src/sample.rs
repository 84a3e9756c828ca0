//! The fixed demo dataset.
//!
//! Eight sample records used to populate an empty store on first run and to
//! restore a known state on an explicit reset.

use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};

use crate::record::{DocumentCategory, DocumentRecord, PDF_MIME_TYPE};

/// Number of records in the demo dataset.
pub const SAMPLE_COUNT: usize = 8;

/// A one-page PDF that renders "Hello, world!".
const SAMPLE_PDF: &str = concat!(
    "%PDF-1.7\n",
    "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n",
    "2 0 obj\n<< /Type /Pages /MediaBox [ 0 0 200 200 ] /Count 1 /Kids [ 3 0 R ] >>\nendobj\n",
    "3 0 obj\n<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>\nendobj\n",
    "4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Times-Roman >>\nendobj\n",
    "5 0 obj\n<< /Length 44 >>\nstream\nBT\n70 50 TD\n/F1 12 Tf\n(Hello, world!) Tj\nET\nendstream\nendobj\n",
    "trailer\n<< /Size 6 /Root 1 0 R >>\n",
    "%%EOF\n",
);

/// The demo PDF as a `data:` URL, shared by every sample record.
#[must_use]
pub fn sample_payload() -> String {
    format!(
        "data:{PDF_MIME_TYPE};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(SAMPLE_PDF)
    )
}

/// Build the demo dataset.
///
/// Records are returned in their canonical stored order (`pdf-001` first).
#[must_use]
pub fn sample_documents() -> Vec<DocumentRecord> {
    let payload = sample_payload();
    let entry = |id: &str,
                 name: &str,
                 size: u64,
                 upload_date: DateTime<Utc>,
                 category: DocumentCategory,
                 description: &str| DocumentRecord {
        id: id.to_string(),
        name: name.to_string(),
        size,
        mime_type: PDF_MIME_TYPE.to_string(),
        upload_date,
        payload: payload.clone(),
        category,
        description: description.to_string(),
    };

    vec![
        entry(
            "pdf-001",
            "Medical Report - Annual Checkup.pdf",
            1_572_864,
            at(2023, 9, 15, 10, 30),
            DocumentCategory::MedicalReport,
            "Annual health checkup results showing all vitals within normal range.",
        ),
        entry(
            "pdf-002",
            "Lab Results - Blood Test.pdf",
            524_288,
            at(2023, 10, 5, 14, 45),
            DocumentCategory::LabResults,
            "Complete blood count (CBC) and metabolic panel results.",
        ),
        entry(
            "pdf-003",
            "Prescription - Medication.pdf",
            262_144,
            at(2023, 11, 20, 9, 15),
            DocumentCategory::Prescription,
            "Prescription for allergy medication.",
        ),
        entry(
            "pdf-004",
            "Vaccination Record - COVID-19.pdf",
            393_216,
            at(2023, 12, 1, 11, 20),
            DocumentCategory::VaccinationRecord,
            "COVID-19 vaccination record including booster shots.",
        ),
        entry(
            "pdf-005",
            "Insurance Policy - Health Coverage.pdf",
            2_306_867,
            at(2024, 1, 15, 9, 45),
            DocumentCategory::InsuranceDocument,
            "Annual health insurance policy and coverage details.",
        ),
        entry(
            "pdf-006",
            "Specialist Referral - Cardiology.pdf",
            307_200,
            at(2024, 2, 10, 14, 30),
            DocumentCategory::ReferralLetter,
            "Referral letter to cardiology specialist for heart palpitations.",
        ),
        entry(
            "pdf-007",
            "Hospital Discharge Summary.pdf",
            1_153_434,
            at(2024, 3, 22, 16, 15),
            DocumentCategory::DischargeSummary,
            "Discharge summary following minor outpatient procedure.",
        ),
        entry(
            "pdf-008",
            "Lab Results - Cholesterol Panel.pdf",
            460_800,
            at(2024, 4, 5, 10, 0),
            DocumentCategory::LabResults,
            "Lipid panel showing cholesterol, HDL, LDL, and triglyceride levels.",
        ),
    ]
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
