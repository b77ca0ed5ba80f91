//! The `sprite_metadata` passes: one C predicate per field family.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::{Document, DocumentKind, Pass, PhaseReport, Records, locate, one_line};
use crate::config::ExtractConfig;
use crate::diagnostic::Severity;
use crate::idiom::Scope;
use crate::idiom::cut::{CUT, CutValue};
use crate::idiom::layer::LAYER;
use crate::idiom::offset::OFFSET;
use crate::idiom::scalar::{MOV, YADD};
use crate::merge::Merger;
use crate::parse::cases::{CaseGroup, FallThrough, case_labels, is_blank, segment, strip_comments};
use crate::parse::function::FunctionBody;
use crate::parse::source::SourceFile;
use crate::record::{MetadataRecord, Record};

static RETURN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\breturn\b").unwrap());

static RETURN_EXPR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^return\s*([^;]*);").unwrap());

static BREAK_OR_RETURN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbreak\s*;|\breturn\b").unwrap());

pub fn extract_metadata(source: &SourceFile, config: &ExtractConfig) -> Document {
    let mut merger = Merger::new();
    let mut phases = Vec::new();
    for &pass in DocumentKind::Metadata.passes() {
        let (records, report) = run_pass(source, config, pass);
        debug!(function = %report.function, entries = report.entries, "metadata pass done");
        merger.extend(records);
        phases.push(report);
    }
    Document {
        kind: DocumentKind::Metadata,
        phases,
        records: Records::Metadata(merger.finish()),
    }
}

pub(crate) fn run_pass(
    source: &SourceFile,
    config: &ExtractConfig,
    pass: Pass,
) -> (Vec<MetadataRecord>, PhaseReport) {
    let mut report = PhaseReport::new(pass, config.function_for(pass));
    let Some(body) = locate(source, &mut report) else {
        return (Vec::new(), report);
    };
    let records = match pass {
        Pass::Door | Pass::NoLighting => presence(&body, pass),
        Pass::Offset => offsets(source, &body, &mut report),
        _ => returns(source, &body, config, pass, &mut report),
    };
    report.entries = records.len();
    (records, report)
}

/// Every case label is a `true`; the return value is not inspected.
fn presence(body: &FunctionBody<'_>, pass: Pass) -> Vec<MetadataRecord> {
    case_labels(&strip_comments(body.text))
        .into_iter()
        .map(|label| {
            let mut record = MetadataRecord::with_id(label.id);
            match pass {
                Pass::Door => record.door = Some(true),
                _ => record.no_lighting = Some(true),
            }
            record
        })
        .collect()
}

fn offsets(
    source: &SourceFile,
    body: &FunctionBody<'_>,
    report: &mut PhaseReport,
) -> Vec<MetadataRecord> {
    let code = strip_comments(body.text);
    let mut records = Vec::new();
    for group in segment(&code, &BREAK_OR_RETURN_RE, FallThrough::Grouped) {
        let case_code = group.body();
        match OFFSET.value(&Scope::new(group.ids[0], case_code)) {
            Some(offset) => records.extend(group.ids.iter().map(|&id| MetadataRecord {
                offset_x: Some(offset.x),
                offset_y: Some(offset.y),
                ..MetadataRecord::with_id(id)
            })),
            None if !is_blank(case_code) => report.group_diagnostic(
                source,
                body,
                &group,
                Severity::Warning,
                format!("no pixel offset assignment in `{}`", one_line(case_code)),
            ),
            None => {}
        }
    }
    records
}

/// A value recovered from one return expression.
enum Field {
    Cut(CutValue),
    Mov(i64),
    Yadd(u32),
    Layer(i64),
}

impl Field {
    fn apply(&self, record: &mut MetadataRecord) {
        match *self {
            Field::Cut(CutValue::Offset { offset, negative }) => {
                record.set_cut_offset(offset, negative)
            }
            Field::Cut(CutValue::Sprite(sprite)) => record.set_cut_sprite(sprite),
            Field::Mov(v) => record.mov = Some(v),
            Field::Yadd(v) => record.yadd = Some(v),
            Field::Layer(v) => record.layer = Some(v),
        }
    }
}

/// Classify each group's return expression with the pass's chain.
fn returns(
    source: &SourceFile,
    body: &FunctionBody<'_>,
    config: &ExtractConfig,
    pass: Pass,
    report: &mut PhaseReport,
) -> Vec<MetadataRecord> {
    let code = strip_comments(body.text);
    let mut records = Vec::new();
    for group in segment(&code, &RETURN_RE, FallThrough::Grouped) {
        let Some(expr) = return_expression(&group) else {
            report.group_diagnostic(
                source,
                body,
                &group,
                Severity::Warning,
                "return without a value",
            );
            continue;
        };
        let scope = Scope::new(group.ids[0], &expr);
        let field = match pass {
            Pass::Cut => CUT.value(&scope).map(Field::Cut),
            Pass::Mov => MOV.value(&scope).map(Field::Mov),
            Pass::Yadd => YADD.value(&scope).map(Field::Yadd),
            Pass::Layer => match LAYER.value(&scope).map(|e| e.resolve(&config.constants)) {
                Some(Ok(v)) => Some(Field::Layer(v)),
                Some(Err(err)) => {
                    report.group_diagnostic(
                        source,
                        body,
                        &group,
                        Severity::Warning,
                        format!("{err} in `{expr}`"),
                    );
                    continue;
                }
                None => None,
            },
            _ => None,
        };
        match field {
            Some(field) => records.extend(group.ids.iter().map(|&id| {
                let mut record = MetadataRecord::with_id(id);
                field.apply(&mut record);
                record
            })),
            None => report.group_diagnostic(
                source,
                body,
                &group,
                Severity::Warning,
                format!("unrecognized return expression `{expr}`"),
            ),
        }
    }
    records
}

/// The expression of the `return` that ends `group`, on one line.
fn return_expression(group: &CaseGroup) -> Option<String> {
    let caps = RETURN_EXPR_RE.captures(group.tail())?;
    let expr = one_line(&caps[1]);
    (!expr.is_empty()).then_some(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{c_function, source};

    fn pass(src: &str, pass: Pass) -> (Vec<MetadataRecord>, PhaseReport) {
        run_pass(&source(src), &ExtractConfig::default(), pass)
    }

    #[test]
    fn shared_cut_offset() {
        let src = c_function(
            "_is_cut_sprite",
            "case 5: case 6: return (int)(sprite + 3); break;\ncase 7: return 0;",
        );
        let (records, report) = pass(&src, Pass::Cut);
        assert_eq!(records.len(), 3);
        assert_eq!((records[0].id, records[0].cut_offset), (5, Some(3)));
        assert_eq!((records[1].id, records[1].cut_offset), (6, Some(3)));
        assert_eq!(records[2].cut_sprite, Some(0));
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.entries, 3);
    }

    #[test]
    fn unknown_cut_expression_is_diagnosed() {
        let src = c_function(
            "_is_cut_sprite",
            "case 100: return 7;\ncase 200: return foo(x);\ncase 300: return sprite + 1;",
        );
        let (records, report) = pass(&src, Pass::Cut);
        let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![100, 300]);
        assert_eq!(report.diagnostics.len(), 1);
        let d = &report.diagnostics[0];
        assert_eq!(d.ids, vec![200]);
        assert!(d.message.contains("foo(x)"));
        assert_eq!(d.line, Some(5));
    }

    #[test]
    fn mov_and_yadd_literals() {
        let src = format!(
            "{}\n{}",
            c_function("_is_mov_sprite", "case 10: case 11: return -5;\ncase 12: return -9;"),
            c_function("_is_yadd_sprite", "case 10: return 20;\ncase 13: return y;")
        );
        let (mov, _) = pass(&src, Pass::Mov);
        let movs: Vec<Option<i64>> = mov.iter().map(|r| r.mov).collect();
        assert_eq!(movs, vec![Some(-5), Some(-5), Some(-9)]);
        let (yadd, report) = pass(&src, Pass::Yadd);
        assert_eq!(yadd.len(), 1);
        assert_eq!(yadd[0].yadd, Some(20));
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn layer_constants() {
        let src = c_function(
            "_get_lay_sprite",
            "case 1: return GND_LAY;\ncase 2: return GND_LAY - 10;\ncase 3: return 105;\ncase 4: return SKY_LAY;",
        );
        let (records, report) = pass(&src, Pass::Layer);
        let layers: Vec<(u32, Option<i64>)> = records.iter().map(|r| (r.id, r.layer)).collect();
        assert_eq!(layers, vec![(1, Some(100)), (2, Some(90)), (3, Some(105))]);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].message.contains("SKY_LAY"));
    }

    #[test]
    fn configured_constants_resolve() {
        let src = c_function("_get_lay_sprite", "case 4: return SKY_LAY - 1;");
        let mut config = ExtractConfig::default();
        config.constants.insert("SKY_LAY", 130);
        let (records, report) = run_pass(&source(&src), &config, Pass::Layer);
        assert_eq!(records[0].layer, Some(129));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn door_is_presence_only() {
        let src = c_function(
            "_is_door_sprite",
            "case 20: case 21:\n\t\treturn 1;\n\tdefault: return 0;",
        );
        let (records, _) = pass(&src, Pass::Door);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.door == Some(true)));
    }

    #[test]
    fn pixel_offsets() {
        let src = c_function(
            "_get_offset_sprite",
            "case 30: case 31: *px = 4; *py = -2; break;\ncase 32: *py = 7; return 1;\ncase 33: helper(); break;",
        );
        let (records, report) = pass(&src, Pass::Offset);
        let got: Vec<(u32, Option<i64>, Option<i64>)> =
            records.iter().map(|r| (r.id, r.offset_x, r.offset_y)).collect();
        assert_eq!(
            got,
            vec![(30, Some(4), Some(-2)), (31, Some(4), Some(-2)), (32, Some(0), Some(7))]
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].ids, vec![33]);
    }

    #[test]
    fn commented_out_return_is_ignored() {
        let src = c_function(
            "_is_cut_sprite",
            "case 8: // return (int)(sprite + 1);\n\treturn 12;",
        );
        let (records, _) = pass(&src, Pass::Cut);
        assert_eq!(records[0].cut_sprite, Some(12));
    }

    #[test]
    fn document_merges_passes() {
        let src = format!(
            "{}\n{}\n{}",
            c_function("_is_cut_sprite", "case 9: return sprite - 1;"),
            c_function("_is_door_sprite", "case 9: case 4: return 1;"),
            c_function("_no_lighting_sprite", "case 2: return 1;"),
        );
        let doc = extract_metadata(&source(&src), &ExtractConfig::default());
        let Records::Metadata(records) = &doc.records else {
            panic!("metadata document holds metadata records");
        };
        let ids: Vec<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 9]);
        assert_eq!(records[2].cut_offset, Some(-1));
        assert_eq!(records[2].door, Some(true));
        assert_eq!(doc.phases.iter().filter(|p| !p.found).count(), 4);
    }
}
