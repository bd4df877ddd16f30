use super::engine::{ProgressSink, RecognitionEngine};
use crate::error::EngineError;
use crate::models::config::RecognitionConfig;
use crate::models::recognition::{ProgressEvent, RecognitionOutput};
use crate::services::data_uri;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const INITIALIZING_API: &str = "initializing api";
/// Boxes overlapping more than this are treated as duplicates
const DUPLICATE_IOU: f64 = 0.3;

/// Recognition engine backed by an OCR HTTP server
#[derive(Clone)]
pub struct HttpRecognitionEngine {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct OcrRequest<'a> {
    image_base64: &'a str,
    lang: &'a str,
}

/// Single text box with bounding box coordinates
#[derive(Deserialize, Clone, Debug)]
pub(crate) struct TextBox {
    #[serde(rename = "box")]
    bbox: Vec<Vec<f64>>, // 4 corner points [[x1,y1], [x2,y2], [x3,y3], [x4,y4]]
    text: String,
    #[allow(dead_code)]
    score: f64,
}

#[derive(Deserialize)]
struct OcrResponse {
    #[serde(default)]
    boxes: Vec<TextBox>,
    #[serde(default)]
    raw_text: String,
}

impl TextBox {
    /// Bounding box as (x_min, y_min, x_max, y_max)
    fn rect(&self) -> (f64, f64, f64, f64) {
        let xs = self.bbox.iter().filter_map(|p| p.first().copied());
        let ys = self.bbox.iter().filter_map(|p| p.get(1).copied());

        let (x_min, x_max) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        let (y_min, y_max) = ys.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });

        (x_min, y_min, x_max, y_max)
    }

    fn area(&self) -> f64 {
        let (x_min, y_min, x_max, y_max) = self.rect();
        if x_max <= x_min || y_max <= y_min {
            return 0.0;
        }
        (x_max - x_min) * (y_max - y_min)
    }

    /// Intersection over Union with another box
    fn iou(&self, other: &TextBox) -> f64 {
        let (x1_min, y1_min, x1_max, y1_max) = self.rect();
        let (x2_min, y2_min, x2_max, y2_max) = other.rect();

        let inter_w = x1_max.min(x2_max) - x1_min.max(x2_min);
        let inter_h = y1_max.min(y2_max) - y1_min.max(y2_min);
        if inter_w <= 0.0 || inter_h <= 0.0 {
            return 0.0;
        }

        let inter_area = inter_w * inter_h;
        let union_area = self.area() + other.area() - inter_area;
        if union_area <= 0.0 {
            return 0.0;
        }

        inter_area / union_area
    }

    fn center_y(&self) -> f64 {
        let (_, y_min, _, y_max) = self.rect();
        (y_min + y_max) / 2.0
    }
}

impl HttpRecognitionEngine {
    pub fn new(config: &RecognitionConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.engine_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if server is healthy
    pub async fn health_check(&self) -> Result<(), EngineError> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(EngineError::Server {
                status: response.status().as_u16(),
                body: "health check failed".to_string(),
            });
        }
        Ok(())
    }

    /// Drop duplicate detections, keeping the larger box of each overlapping pair
    fn filter_overlapping_boxes(boxes: Vec<TextBox>, iou_threshold: f64) -> Vec<TextBox> {
        let mut remaining = boxes;
        let mut kept: Vec<TextBox> = Vec::with_capacity(remaining.len());

        // Smallest first, so pop() yields the largest remaining box
        remaining.sort_by(|a, b| a.area().total_cmp(&b.area()));

        while let Some(current) = remaining.pop() {
            remaining.retain(|other| current.iou(other) <= iou_threshold);
            kept.push(current);
        }

        kept
    }

    /// Lay boxes out in reading order: lines top to bottom, words left to right
    pub(crate) fn process_ocr_boxes(boxes: Vec<TextBox>) -> String {
        let mut boxes: Vec<TextBox> = Self::filter_overlapping_boxes(boxes, DUPLICATE_IOU)
            .into_iter()
            .filter(|b| !b.text.trim().is_empty())
            .collect();
        if boxes.is_empty() {
            return String::new();
        }

        boxes.sort_by(|a, b| a.rect().1.total_cmp(&b.rect().1));

        // A box joins the current line when its vertical center falls inside the line band
        let mut lines: Vec<(f64, f64, Vec<TextBox>)> = Vec::new();
        for text_box in boxes {
            let (_, top, _, bottom) = text_box.rect();
            let center = text_box.center_y();
            let on_current_line = matches!(
                lines.last(),
                Some((line_top, line_bottom, _)) if center >= *line_top && center <= *line_bottom
            );

            if !on_current_line {
                lines.push((top, bottom, vec![text_box]));
            } else if let Some((line_top, line_bottom, words)) = lines.last_mut() {
                *line_top = line_top.min(top);
                *line_bottom = line_bottom.max(bottom);
                words.push(text_box);
            }
        }

        lines
            .into_iter()
            .map(|(_, _, mut words)| {
                words.sort_by(|a, b| a.rect().0.total_cmp(&b.rect().0));
                words
                    .iter()
                    .map(|w| w.text.trim())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl RecognitionEngine for HttpRecognitionEngine {
    fn name(&self) -> &str {
        "http-ocr"
    }

    async fn recognize(
        &self,
        image: &str,
        language: &str,
        progress: ProgressSink,
    ) -> Result<RecognitionOutput, EngineError> {
        progress(ProgressEvent::new(INITIALIZING_API, 0.0));
        let (_mime, image_base64) = data_uri::split(image).map_err(EngineError::InvalidPayload)?;
        progress(ProgressEvent::new(INITIALIZING_API, 1.0));

        progress(ProgressEvent::recognizing(0.0));
        let url = format!("{}/ocr", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&OcrRequest {
                image_base64,
                lang: language,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EngineError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let data: OcrResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Response(e.to_string()))?;
        progress(ProgressEvent::recognizing(1.0));

        let text = if data.boxes.is_empty() {
            data.raw_text
        } else {
            Self::process_ocr_boxes(data.boxes)
        };

        Ok(RecognitionOutput::new(text))
    }
}
