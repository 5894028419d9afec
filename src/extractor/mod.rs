//! 콘텐츠 추출 모듈
//!
//! HTML에서 사이트별 태그 전략으로 본문 텍스트를 추출합니다.
//! 일반적인 본문 추출기가 아니라 URL 부분 문자열 → 셀렉터 종류 테이블입니다.
//! 새 사이트는 `SITE_SELECTORS`에 항목을 추가하여 확장합니다.

use scraper::{Html, Selector};
use thiserror::Error;

// ============================================================================
// Selector Table
// ============================================================================

/// 선택할 요소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// 문단 요소 (`<p>`)
    Paragraph,
    /// 일반 블록 컨테이너 (`<div>`)
    Container,
}

impl SelectorKind {
    /// CSS 셀렉터 문자열
    pub fn css(self) -> &'static str {
        match self {
            SelectorKind::Paragraph => "p",
            SelectorKind::Container => "div",
        }
    }
}

/// 사이트별 셀렉터 테이블 (위에서부터 평가, 첫 매치 우선)
pub const SITE_SELECTORS: &[(&str, SelectorKind)] = &[
    ("example1.com", SelectorKind::Paragraph),
    ("example2.com", SelectorKind::Container),
];

/// 테이블에 매치되지 않을 때의 기본값
pub const DEFAULT_SELECTOR: SelectorKind = SelectorKind::Paragraph;

/// URL에 맞는 셀렉터 종류 결정
pub fn selector_for(source_url: &str) -> SelectorKind {
    SITE_SELECTORS
        .iter()
        .find(|(needle, _)| source_url.contains(needle))
        .map(|&(_, kind)| kind)
        .unwrap_or(DEFAULT_SELECTOR)
}

// ============================================================================
// Extracted Content
// ============================================================================

/// 추출된 콘텐츠
///
/// `text`는 공백 제거 후에도 비어 있지 않음이 보장됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// 원본 URL
    pub source_url: String,
    /// 선택된 요소 텍스트를 공백 하나로 이어 붙인 결과
    pub text: String,
}

/// 추출 실패
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no content determined")]
    NoContent,
}

// ============================================================================
// Extractor
// ============================================================================

/// 사이트별 태그 전략 추출기
///
/// 셀렉터는 생성 시 한 번만 파싱합니다.
#[derive(Debug, Clone)]
pub struct Extractor {
    paragraph: Selector,
    container: Selector,
}

impl Extractor {
    pub fn new() -> Self {
        Self {
            paragraph: Selector::parse(SelectorKind::Paragraph.css()).expect("literal selector"),
            container: Selector::parse(SelectorKind::Container.css()).expect("literal selector"),
        }
    }

    fn selector(&self, kind: SelectorKind) -> &Selector {
        match kind {
            SelectorKind::Paragraph => &self.paragraph,
            SelectorKind::Container => &self.container,
        }
    }

    /// HTML에서 본문 텍스트 추출
    pub fn extract(&self, html: &str, source_url: &str) -> Result<ExtractedContent, ExtractionError> {
        let kind = selector_for(source_url);
        tracing::debug!("Extracting <{}> elements for {}", kind.css(), source_url);

        let selector = self.selector(kind);
        let document = Html::parse_document(html);

        // 중첩된 요소도 각각 선택됨 (문서 순서 유지)
        let text = document
            .select(selector)
            .map(|element| element.text().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ");

        if text.trim().is_empty() {
            return Err(ExtractionError::NoContent);
        }

        Ok(ExtractedContent {
            source_url: source_url.to_string(),
            text,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED_HTML: &str = r#"
        <html>
            <head><title>Mixed</title></head>
            <body>
                <div>Sidebar block</div>
                <p>Cancer affects many.</p>
                <div>Footer block</div>
                <p>Treatment varies.</p>
            </body>
        </html>
    "#;

    #[test]
    fn test_selector_table_order() {
        assert_eq!(selector_for("https://www.example1.com/a"), SelectorKind::Paragraph);
        assert_eq!(selector_for("https://www.example2.com/a"), SelectorKind::Container);
        assert_eq!(selector_for("https://news.other.org/a"), SelectorKind::Paragraph);
        // 첫 매치 우선
        assert_eq!(
            selector_for("https://example1.com/?ref=example2.com"),
            SelectorKind::Paragraph
        );
    }

    #[test]
    fn test_example1_selects_paragraphs_only() {
        let content = Extractor::new()
            .extract(MIXED_HTML, "https://www.example1.com/health")
            .expect("extraction failed");
        assert_eq!(content.text, "Cancer affects many. Treatment varies.");
        assert!(!content.text.contains("Sidebar"));
        assert_eq!(content.source_url, "https://www.example1.com/health");
    }

    #[test]
    fn test_example2_selects_containers() {
        let content = Extractor::new()
            .extract(MIXED_HTML, "https://example2.com/story")
            .expect("extraction failed");
        assert_eq!(content.text, "Sidebar block Footer block");
    }

    #[test]
    fn test_unknown_site_defaults_to_paragraphs() {
        let content = Extractor::new()
            .extract(MIXED_HTML, "https://blog.example.net/post")
            .expect("extraction failed");
        assert_eq!(content.text, "Cancer affects many. Treatment varies.");
    }

    #[test]
    fn test_nested_text_is_included() {
        let html = "<p>Early <b>screening</b> helps.</p>";
        let content = Extractor::new()
            .extract(html, "https://example1.com/")
            .expect("extraction failed");
        assert_eq!(content.text, "Early screening helps.");
    }

    #[test]
    fn test_whitespace_only_is_no_content() {
        let html = "<html><body><p>   </p><p>\n\t</p></body></html>";
        let result = Extractor::new().extract(html, "https://example1.com/");
        assert_eq!(result, Err(ExtractionError::NoContent));
    }

    #[test]
    fn test_no_matching_tags_is_no_content() {
        let html = "<html><body><div>Only a div</div></body></html>";
        let result = Extractor::new().extract(html, "https://example1.com/");
        assert_eq!(result, Err(ExtractionError::NoContent));
        assert_eq!(
            ExtractionError::NoContent.to_string(),
            "no content determined"
        );
    }

    #[test]
    fn test_scripts_outside_paragraphs_are_ignored() {
        let html = r#"<body><script>var x = 1;</script><p>Stay hydrated.</p></body>"#;
        let content = Extractor::new()
            .extract(html, "https://example.org/")
            .expect("extraction failed");
        assert_eq!(content.text, "Stay hydrated.");
    }

    #[test]
    fn test_one_extractor_serves_every_table_entry() {
        let extractor = Extractor::default();
        for &(needle, kind) in SITE_SELECTORS {
            let url = format!("https://www.{}/article", needle);
            let content = extractor.extract(MIXED_HTML, &url).expect("extraction failed");
            let expected = match kind {
                SelectorKind::Paragraph => "Cancer affects many. Treatment varies.",
                SelectorKind::Container => "Sidebar block Footer block",
            };
            assert_eq!(content.text, expected, "{}", url);
        }
    }

    #[test]
    fn test_block_element_closes_open_paragraph() {
        // HTML5 파싱 규칙: <div>를 만나면 열린 <p>가 닫힘
        let html = "<body><p>a<div>b</div></p></body>";
        let content = Extractor::new()
            .extract(html, "https://example1.com/")
            .expect("extraction failed");
        assert_eq!(content.text.trim(), "a");
        assert!(!content.text.contains('b'));
    }
}
