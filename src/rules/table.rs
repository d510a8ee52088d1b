//! Table structure rules, sharing models through the accumulator

use super::{ResultDetail, Rule, RuleContext, RuleError, RuleResult, Severity};
use crate::dom::{Document, NodeId};
use crate::scan::{closest_by_roles, KnownRole};

pub(super) fn size<D: Document + ?Sized>(node: NodeId, ctx: &mut RuleContext<'_, D>) -> RuleResult {
    let model = ctx.tables.get_or_build(ctx.document, node);
    let (rows, columns) = (model.rows, model.columns);
    RuleResult::new(
        Rule::TableSize,
        Severity::Info,
        format!("{} rows × {} columns", rows, columns),
    )
    .with_detail(ResultDetail::TableSize { rows, columns })
}

pub(super) fn position<D: Document + ?Sized>(
    node: NodeId,
    table_roles: &[KnownRole],
    ctx: &mut RuleContext<'_, D>,
) -> Result<Option<RuleResult>, RuleError> {
    let Some(table) = closest_by_roles(ctx.document, node, table_roles) else {
        return Ok(None);
    };
    let cell = ctx
        .tables
        .get_or_build(ctx.document, table)
        .position_of(node)
        .ok_or(RuleError::InconsistentTable { table, cell: node })?;
    let (row, column) = (cell.row + 1, cell.column + 1);
    Ok(Some(
        RuleResult::new(
            Rule::TablePosition,
            Severity::Info,
            format!("row {}, column {}", row, column),
        )
        .with_detail(ResultDetail::TablePosition { row, column }),
    ))
}

#[cfg(test)]
mod tests {
    use crate::dom::{ElementSpec, PageSnapshot, Viewport};
    use crate::rules::test_support::run;
    use crate::rules::{ResultDetail, Tables};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_then_cells_share_one_model() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let table = page.append(body, ElementSpec::new("table"));
        let tr = page.append(table, ElementSpec::new("tr"));
        page.append(tr, ElementSpec::new("th").attr("colspan", "2").text("Name"));
        let tr = page.append(table, ElementSpec::new("tr"));
        page.append(tr, ElementSpec::new("td").text("a"));
        let last = page.append(tr, ElementSpec::new("td").text("b"));

        let mut tables = Tables::new();
        let size = run(&page, table, &mut tables, false);
        assert_eq!(
            size[0].detail,
            Some(ResultDetail::TableSize { rows: 2, columns: 2 })
        );
        let position = run(&page, last, &mut tables, false);
        assert_eq!(
            position[0].detail,
            Some(ResultDetail::TablePosition { row: 2, column: 2 })
        );
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn test_cell_before_its_table_builds_the_model() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let grid = page.append(body, ElementSpec::new("div").attr("role", "grid"));
        let row = page.append(grid, ElementSpec::new("div").attr("role", "row"));
        let cell = page.append(row, ElementSpec::new("div").attr("role", "gridcell").text("x"));

        let mut tables = Tables::new();
        let results = run(&page, cell, &mut tables, false);
        assert_eq!(
            results[0].detail,
            Some(ResultDetail::TablePosition { row: 1, column: 1 })
        );
        assert!(tables.find(grid).is_some());
    }

    #[test]
    fn test_cell_outside_any_row_is_omitted() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let table = page.append(body, ElementSpec::new("table"));
        let stray = page.append(table, ElementSpec::new("td").text("loose"));

        assert!(run(&page, stray, &mut Tables::new(), false).is_empty());
    }

    #[test]
    fn test_cell_without_table_reports_nothing() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let cell = page.append(body, ElementSpec::new("div").attr("role", "cell").text("x"));

        assert!(run(&page, cell, &mut Tables::new(), false).is_empty());
    }
}
