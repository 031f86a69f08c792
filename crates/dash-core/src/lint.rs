//! Structural checks for layout documents.
//!
//! Reports invariant violations without modifying the template. Callers
//! decide whether to reject a document or just log the findings.

use crate::model::Template;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Breaks a document invariant.
    Error,
    /// Tolerated, but the grid surface will adjust it.
    Warning,
}

/// A single finding for one widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintDiagnostic {
    /// Id of the widget concerned, as a string.
    pub widget: String,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-widget-id").
    pub rule: &'static str,
}

impl LintDiagnostic {
    fn error(widget: &str, rule: &'static str, message: String) -> Self {
        Self {
            widget: widget.to_string(),
            message,
            severity: LintSeverity::Error,
            rule,
        }
    }

    fn warning(widget: &str, rule: &'static str, message: String) -> Self {
        Self {
            widget: widget.to_string(),
            message,
            severity: LintSeverity::Warning,
            rule,
        }
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all rules over the template and return diagnostics.
#[must_use]
pub fn lint_template(template: &Template) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_unique_ids(template, &mut diags);
    lint_sizes(template, &mut diags);
    lint_column_bound(template, &mut diags);
    diags
}

/// True when no rule reports an error.
pub fn is_valid(template: &Template) -> bool {
    lint_template(template)
        .iter()
        .all(|d| d.severity != LintSeverity::Error)
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_unique_ids(template: &Template, diags: &mut Vec<LintDiagnostic>) {
    let mut widget_ids = HashSet::new();
    let mut item_ids = HashSet::new();
    for widget in &template.widgets {
        if !widget_ids.insert(widget.id) {
            diags.push(LintDiagnostic::error(
                widget.id.as_str(),
                "duplicate-widget-id",
                format!("Widget id `{}` is used more than once.", widget.id),
            ));
        }
        if !item_ids.insert(widget.grid_item.id) {
            diags.push(LintDiagnostic::error(
                widget.id.as_str(),
                "duplicate-grid-item-id",
                format!(
                    "Grid item id `{}` of `{}` is shared with another widget.",
                    widget.grid_item.id, widget.display_name
                ),
            ));
        }
    }
}

fn lint_sizes(template: &Template, diags: &mut Vec<LintDiagnostic>) {
    for widget in &template.widgets {
        let item = &widget.grid_item;
        if item.w == 0 || item.h == 0 || item.min_w == 0 || item.min_h == 0 {
            diags.push(LintDiagnostic::error(
                widget.id.as_str(),
                "zero-size",
                format!(
                    "`{}` has a zero size or minimum size ({}x{}, min {}x{}).",
                    widget.display_name, item.w, item.h, item.min_w, item.min_h
                ),
            ));
        }
        if item.w < item.min_w || item.h < item.min_h {
            diags.push(LintDiagnostic::error(
                widget.id.as_str(),
                "below-min-size",
                format!(
                    "`{}` is {}x{} but its minimum is {}x{}.",
                    widget.display_name, item.w, item.h, item.min_w, item.min_h
                ),
            ));
        }
    }
}

fn lint_column_bound(template: &Template, diags: &mut Vec<LintDiagnostic>) {
    for widget in &template.widgets {
        if widget.grid_item.right() > template.columns {
            diags.push(LintDiagnostic::warning(
                widget.id.as_str(),
                "column-overflow",
                format!(
                    "`{}` ends at column {} but the grid has {} columns.",
                    widget.display_name,
                    widget.grid_item.right(),
                    template.columns
                ),
            ));
        }
    }
}
