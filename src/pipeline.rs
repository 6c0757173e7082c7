// 📸 Receipt Ingestion Pipeline
// Orchestrates OCR (primary model, then a lower-capacity fallback) and the
// extraction passes. Ingestion failures are absorbed, never surfaced: the
// receipt flow must stay usable even with no working OCR, so the worst case
// is a placeholder receipt the user corrects by hand.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::extract::{extract_date, extract_store_name, extract_total, truncate_chars};
use crate::line_items::parse_line_items;
use crate::normalize::candidate_lines;
use crate::receipt::ParsedReceipt;

/// Primary OCR model identifier.
pub const PRIMARY_OCR_MODEL: &str = "microsoft/trocr-large-printed";
/// Lower-capacity model retried when the primary fails.
pub const FALLBACK_OCR_MODEL: &str = "microsoft/trocr-base-printed";
/// Raw OCR text reported back to the caller is bounded to this many chars.
pub const MAX_RAW_TEXT_LEN: usize = 5000;

// ============================================================================
// OCR PORT
// ============================================================================

/// Response shape of the external OCR capability: some models return the
/// text directly, others wrap it in an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OcrText {
    Structured { generated_text: String },
    Plain(String),
}

impl OcrText {
    pub fn into_text(self) -> String {
        match self {
            OcrText::Plain(text) => text,
            OcrText::Structured { generated_text } => generated_text,
        }
    }
}

/// External OCR collaborator port.
///
/// Implementations own their transport and must bound their own call time;
/// the pipeline only guarantees a fallback result on any `Err`.
pub trait OcrEngine: Send + Sync {
    fn image_to_text(&self, image: &[u8], model: &str) -> Result<OcrText>;
}

// ============================================================================
// RESULT ENVELOPE
// ============================================================================

/// Outcome of one ingestion. `success` is true even for the degraded
/// fallback receipt - only malformed requests upstream of the pipeline
/// count as failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ParsedReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// ReceiptIngestionPipeline - image bytes in, structured receipt out.
pub struct ReceiptPipeline {
    ocr: Arc<dyn OcrEngine>,
    primary_model: String,
    fallback_model: String,
    clock: Box<dyn Clock>,
}

impl ReceiptPipeline {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        ReceiptPipeline {
            ocr,
            primary_model: PRIMARY_OCR_MODEL.to_string(),
            fallback_model: FALLBACK_OCR_MODEL.to_string(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_models(mut self, primary: &str, fallback: &str) -> Self {
        self.primary_model = primary.to_string();
        self.fallback_model = fallback.to_string();
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Ingest a receipt image. Never returns an error: OCR failure on both
    /// models degrades to the fallback receipt, still reported as success.
    pub fn ingest(&self, image: &[u8]) -> IngestionResult {
        let text = match self.ocr.image_to_text(image, &self.primary_model) {
            Ok(text) => text.into_text(),
            Err(primary_err) => {
                eprintln!(
                    "[ocr] primary model {} failed ({}), trying {}",
                    self.primary_model, primary_err, self.fallback_model
                );
                match self.ocr.image_to_text(image, &self.fallback_model) {
                    Ok(text) => text.into_text(),
                    Err(fallback_err) => {
                        eprintln!("[ocr] fallback model failed too: {}", fallback_err);
                        return IngestionResult {
                            success: true,
                            data: Some(ParsedReceipt::fallback(self.clock.today())),
                            raw_text: None,
                            error: None,
                            note: Some(
                                "Receipt processing failed, please manually add items"
                                    .to_string(),
                            ),
                        };
                    }
                }
            }
        };

        let receipt = self.parse_text(&text);

        IngestionResult {
            success: true,
            data: Some(receipt),
            raw_text: (!text.is_empty()).then(|| truncate_chars(&text, MAX_RAW_TEXT_LEN)),
            error: None,
            note: None,
        }
    }

    /// Extraction steps on already-OCR'd text: normalize → fields → line
    /// items → assemble. Total over any input, including empty/garbage text.
    pub fn parse_text(&self, raw: &str) -> ParsedReceipt {
        let today = self.clock.today();
        let lines = candidate_lines(raw);

        let store_name = extract_store_name(&lines);
        let date = extract_date(raw, today);
        let total = extract_total(raw, &lines);
        let items = parse_line_items(&lines);

        ParsedReceipt::assemble(items, store_name, date, total)
    }
}

// ============================================================================
// TESTS
// ============================================================================
