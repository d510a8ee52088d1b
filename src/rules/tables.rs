//! Table models and the per-pass accumulator that shares them between rules

use crate::dom::{Document, NodeId};
use crate::scan::{resolve_role, KnownRole};

const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// Zero-based slot of a cell in its table grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub node: NodeId,
    pub row: usize,
    pub column: usize,
}

/// Grid layout of one table, spans applied
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub root: NodeId,
    pub rows: usize,
    pub columns: usize,
    cells: Vec<CellPosition>,
}

impl TableModel {
    /// Lay out the rows and cells of `root`, ignoring nested tables
    pub fn build<D: Document + ?Sized>(doc: &D, root: NodeId) -> Self {
        // first row at which each column is free again
        let mut busy_until: Vec<usize> = Vec::new();
        let mut cells = Vec::new();
        let mut columns = 0;

        let row_nodes = collect_within(doc, root, &|n| is_row(doc, n));
        let rows = row_nodes.len();
        for (row, row_node) in row_nodes.into_iter().enumerate() {
            let remaining = rows - row;
            let mut column = 0;
            for cell in collect_within(doc, row_node, &|n| is_cell(doc, n)) {
                while busy_until.get(column).is_some_and(|&until| until > row) {
                    column += 1;
                }
                let rowspan = match raw_span(doc, cell, "rowspan") {
                    Some(0) => remaining,
                    Some(n) => n.min(MAX_ROWSPAN).min(remaining),
                    None => 1,
                };
                let colspan = span(doc, cell, "colspan", MAX_COLSPAN);
                if busy_until.len() < column + colspan {
                    busy_until.resize(column + colspan, 0);
                }
                for until in &mut busy_until[column..column + colspan] {
                    *until = row + rowspan;
                }
                cells.push(CellPosition {
                    node: cell,
                    row,
                    column,
                });
                column += colspan;
                columns = columns.max(column);
            }
        }

        Self {
            root,
            rows,
            columns,
            cells,
        }
    }

    pub fn cells(&self) -> &[CellPosition] {
        &self.cells
    }

    pub fn position_of(&self, cell: NodeId) -> Option<CellPosition> {
        self.cells.iter().find(|c| c.node == cell).copied()
    }
}

/// Append-only list of table models built during one scan pass
#[derive(Debug, Default)]
pub struct Tables {
    models: Vec<TableModel>,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, root: NodeId) -> Option<&TableModel> {
        self.models.iter().find(|m| m.root == root)
    }

    /// The model for `root`, building and recording it on first use
    pub fn get_or_build<D: Document + ?Sized>(&mut self, doc: &D, root: NodeId) -> &TableModel {
        let index = match self.models.iter().position(|m| m.root == root) {
            Some(index) => index,
            None => {
                self.models.push(TableModel::build(doc, root));
                self.models.len() - 1
            }
        };
        &self.models[index]
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

pub(crate) fn is_table<D: Document + ?Sized>(doc: &D, node: NodeId) -> bool {
    doc.tag_name(node) == "table"
        || matches!(
            resolve_role(doc, node),
            Some(KnownRole::Table | KnownRole::Grid | KnownRole::Treegrid)
        )
}

fn is_row<D: Document + ?Sized>(doc: &D, node: NodeId) -> bool {
    doc.tag_name(node) == "tr" || resolve_role(doc, node) == Some(KnownRole::Row)
}

fn is_cell<D: Document + ?Sized>(doc: &D, node: NodeId) -> bool {
    matches!(doc.tag_name(node), "td" | "th")
        || matches!(
            resolve_role(doc, node),
            Some(
                KnownRole::Cell
                    | KnownRole::Gridcell
                    | KnownRole::Columnheader
                    | KnownRole::Rowheader
            )
        )
}

/// Outermost descendants of `root` accepted by `target`, in tree order,
/// without entering nested tables
fn collect_within<D: Document + ?Sized>(
    doc: &D,
    root: NodeId,
    target: &dyn Fn(NodeId) -> bool,
) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(root).iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        if target(node) {
            found.push(node);
        } else if !is_table(doc, node) {
            stack.extend(doc.children(node).iter().rev().copied());
        }
    }
    found
}

fn raw_span<D: Document + ?Sized>(doc: &D, cell: NodeId, name: &str) -> Option<usize> {
    doc.attribute(cell, name)
        .and_then(|v| v.trim().parse::<usize>().ok())
}

/// `colspan` as browsers read it: missing, zero or invalid is 1
fn span<D: Document + ?Sized>(doc: &D, cell: NodeId, name: &str, max: usize) -> usize {
    raw_span(doc, cell, name)
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, PageSnapshot, Viewport};
    use pretty_assertions::assert_eq;

    fn row(page: &mut PageSnapshot, parent: NodeId, cells: &[ElementSpec]) -> Vec<NodeId> {
        let tr = page.append(parent, ElementSpec::new("tr"));
        cells
            .iter()
            .map(|spec| page.append(tr, spec.clone()))
            .collect()
    }

    #[test]
    fn test_simple_grid() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let table = page.append(body, ElementSpec::new("table"));
        let tbody = page.append(table, ElementSpec::new("tbody"));
        let td = ElementSpec::new("td");
        row(&mut page, tbody, &[td.clone(), td.clone(), td.clone()]);
        let second = row(&mut page, tbody, &[td.clone(), td.clone(), td]);

        let model = TableModel::build(&page, table);
        assert_eq!((model.rows, model.columns), (2, 3));
        assert_eq!(
            model.position_of(second[2]),
            Some(CellPosition {
                node: second[2],
                row: 1,
                column: 2
            })
        );
    }

    #[test]
    fn test_spans_shift_later_cells() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let table = page.append(body, ElementSpec::new("table"));
        let first = row(
            &mut page,
            table,
            &[
                ElementSpec::new("th").attr("rowspan", "2"),
                ElementSpec::new("th").attr("colspan", "2"),
            ],
        );
        let second = row(
            &mut page,
            table,
            &[ElementSpec::new("td"), ElementSpec::new("td").attr("colspan", "0")],
        );

        let model = TableModel::build(&page, table);
        assert_eq!((model.rows, model.columns), (2, 3));
        assert_eq!(model.position_of(first[1]).map(|c| c.column), Some(1));
        assert_eq!(model.position_of(second[0]).map(|c| c.column), Some(1));
        assert_eq!(model.position_of(second[1]).map(|c| c.column), Some(2));
    }

    #[test]
    fn test_nested_tables_are_separate() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let outer = page.append(body, ElementSpec::new("table"));
        let cells = row(&mut page, outer, &[ElementSpec::new("td")]);
        let inner = page.append(cells[0], ElementSpec::new("table"));
        row(&mut page, inner, &[ElementSpec::new("td"), ElementSpec::new("td")]);
        row(&mut page, inner, &[ElementSpec::new("td")]);

        let model = TableModel::build(&page, outer);
        assert_eq!((model.rows, model.columns), (1, 1));
        assert_eq!(model.cells().len(), 1);
    }

    #[test]
    fn test_aria_grid_rows_and_cells() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let grid = page.append(body, ElementSpec::new("div").attr("role", "grid"));
        let r = page.append(grid, ElementSpec::new("div").attr("role", "row"));
        let wrapper = page.append(r, ElementSpec::new("div"));
        page.append(wrapper, ElementSpec::new("div").attr("role", "gridcell"));
        page.append(r, ElementSpec::new("div").attr("role", "gridcell"));

        let model = TableModel::build(&page, grid);
        assert_eq!((model.rows, model.columns), (1, 2));
    }

    #[test]
    fn test_accumulator_builds_once() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let table = page.append(body, ElementSpec::new("table"));
        row(&mut page, table, &[ElementSpec::new("td")]);

        let mut tables = Tables::new();
        assert!(tables.is_empty());
        assert!(tables.find(table).is_none());
        assert_eq!(tables.get_or_build(&page, table).rows, 1);
        tables.get_or_build(&page, table);
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn test_rowspan_stops_at_last_row() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let table = page.append(body, ElementSpec::new("table"));
        row(
            &mut page,
            table,
            &[ElementSpec::new("td").attr("rowspan", "65534").attr("colspan", "1000")],
        );

        let started = std::time::Instant::now();
        let model = TableModel::build(&page, table);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!((model.rows, model.columns), (1, 1000));
        assert_eq!(model.cells().len(), 1);
    }

    #[test]
    fn test_zero_rowspan_covers_remaining_rows() {
        let mut page = PageSnapshot::new(Viewport::new(800.0, 600.0));
        let body = page.body_element();
        let table = page.append(body, ElementSpec::new("table"));
        row(
            &mut page,
            table,
            &[ElementSpec::new("th").attr("rowspan", "0"), ElementSpec::new("td")],
        );
        let second = row(&mut page, table, &[ElementSpec::new("td")]);
        let third = row(&mut page, table, &[ElementSpec::new("td")]);

        let model = TableModel::build(&page, table);
        assert_eq!((model.rows, model.columns), (3, 2));
        assert_eq!(model.position_of(second[0]).map(|c| c.column), Some(1));
        assert_eq!(model.position_of(third[0]).map(|c| c.column), Some(1));
    }
}
