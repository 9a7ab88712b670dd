//! Document-to-snapshot extraction.
//!
//! The source is a loosely structured page whose layout changes without notice,
//! so every lookup here is a heuristic rather than an exact contract:
//!
//! - **Boxes.** For each `BoxLabel`, the label element is the first container (in
//!   document order) whose text contains the label and that has no descendant
//!   container containing it too. This is the innermost matching container, not
//!   the outermost one, which is typically a page-wide wrapper. The box is the nearest of that element
//!   and a few of its container ancestors that holds at least one numeric token.
//!   Climbing is bounded by `ExtractorConfig::max_climb` and stops before an
//!   ancestor that also mentions another label, so one block never borrows the
//!   values of its neighbour. The first four tokens bind
//!   positionally to bid/ask/high/low.
//! - **Tables.** Every table is kept verbatim and classified by the first keyword
//!   of a fixed priority list found in its markup.
//! - **Movement.** Every marker element yields its text and a direction read from
//!   its classes (up classes win over down classes).
//!
//! A label that is not found is not an error: its box is `None`. Only
//! configuration that cannot be compiled into selectors, or a blank document,
//! fails.
use std::iter;

use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use strum::IntoEnumIterator;

use crate::document::Document;
use crate::error::RatesError;
use crate::labels::BoxLabel;
use crate::model::{
    Direction, FutureQuotes, MovementEntry, NextQuotes, QuoteBox, Snapshot, SpotQuotes,
    TableClass, TableEntry,
};
use crate::result::Result;
use crate::text::{TokenPolicy, normalize_ws};

/// Tunables of the extraction heuristics.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Elements eligible as label holders and boxes.
    pub box_selector: String,
    /// Inline elements holding one value each.
    pub value_selector: String,
    /// Table-like elements.
    pub table_selector: String,
    /// Movement marker elements.
    pub movement_selector: String,
    /// Classes marking an upward movement; checked first.
    pub up_classes: Vec<String>,
    /// Classes marking a downward movement.
    pub down_classes: Vec<String>,
    /// Which value-holder texts count as numeric tokens.
    pub token_policy: TokenPolicy,
    /// Keyword priority list for table classification; the first keyword found wins.
    pub table_keywords: Vec<(String, TableClass)>,
    /// How many container ancestors above the label element may become the box.
    pub max_climb: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            box_selector: "div".to_string(),
            value_selector: "span".to_string(),
            table_selector: "table".to_string(),
            movement_selector: ".movement".to_string(),
            up_classes: vec!["up".into(), "green".into(), "text-success".into()],
            down_classes: vec!["down".into(), "red".into(), "text-danger".into()],
            token_policy: TokenPolicy::Lenient,
            table_keywords: vec![
                ("RTGS".to_string(), TableClass::Rtgs),
                ("Retail".to_string(), TableClass::Retail),
            ],
            max_climb: 3,
        }
    }
}

/// Compiled extractor. Holds no per-document state and can be shared across threads.
#[derive(Debug)]
pub struct Extractor {
    config: ExtractorConfig,
    container: Selector,
    value: Selector,
    table: Selector,
    row: Selector,
    cell: Selector,
    marker: Selector,
}

/// Containers of one parsed document with their normalised text, in document order.
struct Containers<'a> {
    entries: Vec<(ElementRef<'a>, String)>,
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| RatesError::Extraction(format!("invalid selector {css:?}: {e:?}")))
}

/// Whitespace-normalised text of an element, text nodes concatenated as rendered.
fn text_of(el: &ElementRef) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// `true` when `el` lies strictly inside `outer`.
fn is_within(el: &ElementRef, outer: &ElementRef) -> bool {
    el.ancestors().any(|node| node.id() == outer.id())
}

impl Extractor {
    /// Compile `config` into an extractor.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        Ok(Self {
            container: parse_selector(&config.box_selector)?,
            value: parse_selector(&config.value_selector)?,
            table: parse_selector(&config.table_selector)?,
            row: parse_selector("tr")?,
            cell: parse_selector("th, td")?,
            marker: parse_selector(&config.movement_selector)?,
            config,
        })
    }

    /// Extract a brand-new snapshot from `document`.
    pub fn extract(&self, document: &Document) -> Result<Snapshot> {
        if document.is_blank() {
            return Err(RatesError::Extraction(format!(
                "blank document from {}",
                document.url()
            )));
        }
        let html = Html::parse_document(document.html());
        let containers = self.containers(&html);
        let quote = |label| self.quote_box(&containers, label);

        Ok(Snapshot {
            spots: SpotQuotes {
                gold: quote(BoxLabel::GoldSpot),
                silver: quote(BoxLabel::SilverSpot),
                inr: quote(BoxLabel::InrSpot),
            },
            futures: FutureQuotes {
                gold: quote(BoxLabel::GoldFuture),
                silver: quote(BoxLabel::SilverFuture),
            },
            next: NextQuotes {
                gold: quote(BoxLabel::GoldNext),
                silver: quote(BoxLabel::SilverNext),
            },
            tables: self.tables(&html),
            movement: self.movement(&html),
        })
    }

    fn containers<'a>(&self, html: &'a Html) -> Containers<'a> {
        Containers {
            entries: html
                .select(&self.container)
                .map(|el| (el, text_of(&el)))
                .collect(),
        }
    }

    /// Innermost container holding `label`, taking the first match in document order.
    fn label_element<'a>(&self, containers: &Containers<'a>, label: &str) -> Option<ElementRef<'a>> {
        let mut found: Option<ElementRef<'a>> = None;
        for (el, text) in &containers.entries {
            if let Some(best) = &found {
                // Preorder: once we leave the subtree of the match, nothing deeper follows.
                if !is_within(el, best) {
                    break;
                }
            }
            if text.contains(label) {
                found = Some(*el);
            }
        }
        found
    }

    fn quote_box(&self, containers: &Containers, label: BoxLabel) -> Option<QuoteBox> {
        let target = label.to_string();
        let label_el = self.label_element(containers, &target)?;
        let others: Vec<String> = BoxLabel::iter()
            .filter(|other| *other != label)
            .map(|other| other.to_string())
            .collect();

        let ancestors = label_el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .filter(|el| self.container.matches(el))
            .take(self.config.max_climb);

        for candidate in iter::once(label_el).chain(ancestors) {
            if candidate.id() != label_el.id() {
                let text = text_of(&candidate);
                if others.iter().any(|other| text.contains(other.as_str())) {
                    break;
                }
            }
            let tokens = self.value_tokens(&candidate);
            if !tokens.is_empty() {
                return Some(QuoteBox::from_tokens(tokens));
            }
        }
        Some(QuoteBox::default())
    }

    /// Numeric tokens of the leaf value holders under `scope`, in source order.
    fn value_tokens(&self, scope: &ElementRef) -> Vec<String> {
        scope
            .select(&self.value)
            .filter(|holder| holder.select(&self.value).next().is_none())
            .filter_map(|holder| {
                self.config
                    .token_policy
                    .token(&holder.text().collect::<String>())
            })
            .collect()
    }

    fn tables(&self, html: &Html) -> Vec<TableEntry> {
        html.select(&self.table)
            .map(|table| {
                let raw_markup = table.html();
                TableEntry {
                    classification: self.classify(&raw_markup),
                    rows: self.rows(&table),
                    raw_markup,
                }
            })
            .collect()
    }

    /// Classify table markup by the first keyword of the priority list it contains.
    pub fn classify(&self, markup: &str) -> TableClass {
        self.config
            .table_keywords
            .iter()
            .find(|(keyword, _)| markup.contains(keyword.as_str()))
            .map(|(_, class)| *class)
            .unwrap_or(TableClass::Unknown)
    }

    fn rows(&self, table: &ElementRef) -> Vec<Vec<String>> {
        table
            .select(&self.row)
            .map(|row| row.select(&self.cell).map(|cell| text_of(&cell)).collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect()
    }

    fn movement(&self, html: &Html) -> Vec<MovementEntry> {
        html.select(&self.marker)
            .map(|marker| MovementEntry {
                value: text_of(&marker),
                direction: self.direction(marker.value()),
            })
            .collect()
    }

    fn direction(&self, element: &Element) -> Direction {
        let has_any = |names: &[String]| element.classes().any(|c| names.iter().any(|n| n == c));
        if has_any(self.config.up_classes.as_slice()) {
            Direction::Up
        } else if has_any(self.config.down_classes.as_slice()) {
            Direction::Down
        } else {
            Direction::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(ExtractorConfig::default()).unwrap()
    }

    fn extract(body: &str) -> Snapshot {
        let html = format!("<html><head></head><body>{body}</body></html>");
        extractor()
            .extract(&Document::new("http://rates.test/", html))
            .unwrap()
    }

    fn quote(values: &[&str]) -> QuoteBox {
        QuoteBox::from_tokens(values.iter().map(|v| v.to_string()))
    }

    const BOARD: &str = r#"
        <div class="board">
          <div class="box">
            <div class="title">GOLD SPOT</div>
            <div class="row"><span>BID</span><span>1234.50</span></div>
            <div class="row"><span>ASK</span><span>1235.00</span></div>
            <div class="row"><span>H</span><span>1240.10</span><span>L</span><span>1228.00</span></div>
          </div>
          <div class="box">
            <div class="title">SILVER SPOT</div>
            <span>28.10</span><span>28.30</span><span>28.90</span><span>27.95</span>
          </div>
          <div class="box"><div class="title">INR SPOT</div><span>83.12</span><span>83.15</span></div>
          <div class="box"><div class="title">GOLD FUTURE</div><span>62100</span><span>62150</span></div>
          <div class="box"><div class="title">SILVER FUTURE</div><span>74500</span></div>
        </div>
        <table class="rates"><tr><th>Product</th><th>RTGS</th></tr><tr><td>Gold 995</td><td>62 000</td></tr></table>
        <table class="rates"><tr><th>Retail</th></tr><tr><td>Gold 22K</td></tr></table>
        <table><tr><td>Contact us</td></tr></table>
        <div class="changes">
          <span class="movement up">+12.50</span>
          <span class="movement red">-0.40</span>
          <span class="movement">0.00</span>
        </div>
    "#;

    #[test]
    fn boxes_bind_values_in_source_order() {
        let snapshot = extract(BOARD);
        assert_eq!(
            snapshot.spots.gold,
            Some(quote(&["1234.50", "1235.00", "1240.10", "1228.00"]))
        );
        assert_eq!(
            snapshot.spots.silver,
            Some(quote(&["28.10", "28.30", "28.90", "27.95"]))
        );
        assert_eq!(snapshot.spots.inr, Some(quote(&["83.12", "83.15"])));
        assert_eq!(snapshot.futures.gold, Some(quote(&["62100", "62150"])));
        assert_eq!(snapshot.futures.silver, Some(quote(&["74500"])));
    }

    #[test]
    fn missing_labels_yield_none_not_empty_boxes() {
        let snapshot = extract(BOARD);
        assert_eq!(snapshot.next.gold, None);
        assert_eq!(snapshot.next.silver, None);
        assert_eq!(snapshot.boxes_found(), 5);
    }

    #[test]
    fn document_without_gold_spot_leaves_other_keys_intact() {
        let snapshot = extract(
            r#"<div><div>SILVER SPOT</div><span>28.10</span><span>28.30</span></div>"#,
        );
        assert_eq!(snapshot.spots.gold, None);
        assert_eq!(snapshot.spots.silver, Some(quote(&["28.10", "28.30"])));
    }

    #[test]
    fn two_spans_fill_bid_and_ask_only() {
        let snapshot = extract(r#"<div>GOLD SPOT <span>1234.50</span><span>1235.00</span></div>"#);
        let gold = snapshot.spots.gold.unwrap();
        assert_eq!(gold.bid.as_deref(), Some("1234.50"));
        assert_eq!(gold.ask.as_deref(), Some("1235.00"));
        assert_eq!(gold.high, None);
        assert_eq!(gold.low, None);
    }

    #[test]
    fn found_box_without_values_is_empty_not_none() {
        let snapshot = extract(r#"<div class="box"><div>GOLD NEXT</div><span>--</span></div>"#);
        let gold = snapshot.next.gold.unwrap();
        assert!(gold.is_empty());
    }

    #[test]
    fn box_does_not_borrow_values_from_a_neighbouring_label() {
        let snapshot = extract(
            r#"<div class="wrap">
                 <div>GOLD NEXT</div>
                 <div>SILVER NEXT <span>75100</span></div>
               </div>"#,
        );
        assert_eq!(snapshot.next.gold, Some(QuoteBox::default()));
        assert_eq!(snapshot.next.silver, Some(quote(&["75100"])));
    }

    #[test]
    fn box_is_the_innermost_block_not_the_page_wrapper() {
        let snapshot = extract(
            r#"<div class="page"><span>9999</span>
                 <div class="box"><div>GOLD SPOT</div><span>1234.50</span><span>1235.00</span></div>
               </div>"#,
        );
        assert_eq!(snapshot.spots.gold, Some(quote(&["1234.50", "1235.00"])));
    }

    #[test]
    fn label_split_across_inline_elements_still_matches() {
        let snapshot = extract(r#"<div>GO<b>LD</b> SPOT <span>1234.50</span></div>"#);
        assert_eq!(snapshot.spots.gold, Some(quote(&["1234.50"])));
    }

    #[test]
    fn missing_leading_value_shifts_the_rest_left() {
        let snapshot = extract(
            r#"<div>GOLD SPOT <span>-</span><span>1235.00</span><span>1240.10</span></div>"#,
        );
        assert_eq!(
            snapshot.spots.gold,
            Some(quote(&["1235.00", "1240.10"]))
        );
    }

    #[test]
    fn nested_value_holders_count_once() {
        let snapshot =
            extract(r#"<div>INR SPOT <span><span>83.12</span></span><span>83.15</span></div>"#);
        assert_eq!(snapshot.spots.inr, Some(quote(&["83.12", "83.15"])));
    }

    #[test]
    fn strict_policy_strips_currency_marks() {
        let config = ExtractorConfig {
            token_policy: TokenPolicy::Strict,
            ..ExtractorConfig::default()
        };
        let snapshot = Extractor::new(config)
            .unwrap()
            .extract(&Document::new(
                "http://rates.test/",
                r#"<div>GOLD SPOT <span>₹ 1,234.50</span><span>₹ 1,235.00</span></div>"#,
            ))
            .unwrap();
        assert_eq!(snapshot.spots.gold, Some(quote(&["1234.50", "1235.00"])));
    }

    #[test]
    fn tables_are_classified_and_kept_verbatim() {
        let snapshot = extract(BOARD);
        let classes: Vec<TableClass> = snapshot.tables.iter().map(|t| t.classification).collect();
        assert_eq!(
            classes,
            [TableClass::Rtgs, TableClass::Retail, TableClass::Unknown]
        );
        assert!(snapshot.tables[0].raw_markup.starts_with("<table"));
        assert!(snapshot.tables[0].raw_markup.contains("Gold 995"));
        assert_eq!(
            snapshot.tables[0].rows,
            vec![
                vec!["Product".to_string(), "RTGS".to_string()],
                vec!["Gold 995".to_string(), "62 000".to_string()],
            ]
        );
    }

    #[test]
    fn first_keyword_in_priority_order_wins() {
        let extractor = extractor();
        let markup = "<table><tr><td>Retail</td><td>RTGS</td></tr></table>";
        assert_eq!(extractor.classify(markup), TableClass::Rtgs);
        let reversed = "<table><tr><td>RTGS</td><td>Retail</td></tr></table>";
        assert_eq!(extractor.classify(reversed), TableClass::Rtgs);
        assert_eq!(extractor.classify("<table>rtgs</table>"), TableClass::Unknown);
    }

    #[test]
    fn movement_direction_follows_class_priority() {
        let snapshot = extract(BOARD);
        let directions: Vec<(String, Direction)> = snapshot
            .movement
            .iter()
            .map(|m| (m.value.clone(), m.direction))
            .collect();
        assert_eq!(
            directions,
            [
                ("+12.50".to_string(), Direction::Up),
                ("-0.40".to_string(), Direction::Down),
                ("0.00".to_string(), Direction::Unchanged),
            ]
        );

        let both = extract(r#"<span class="movement down up">1</span>"#);
        assert_eq!(both.movement[0].direction, Direction::Up);
    }

    #[test]
    fn unchanged_document_extracts_to_equal_snapshots() {
        assert_eq!(extract(BOARD), extract(BOARD));
    }

    #[test]
    fn blank_documents_fail() {
        let err = extractor()
            .extract(&Document::new("http://rates.test/", "  \n"))
            .unwrap_err();
        assert!(matches!(err, RatesError::Extraction(_)));
    }

    #[test]
    fn invalid_selectors_fail_construction() {
        let config = ExtractorConfig {
            movement_selector: "span[".to_string(),
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            Extractor::new(config),
            Err(RatesError::Extraction(_))
        ));
    }
}
