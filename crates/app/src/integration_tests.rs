//! Integration tests for the full pipeline.
//!
//! Tests: operation → store → change feed → recomputed totals, the way a
//! display layer consumes the core.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use obraplan_budgets::{BudgetLine, compute_totals};
    use obraplan_core::DomainError;
    use obraplan_store::{ChangeSet, Subscription};

    use crate::App;

    /// Decode the line set out of a change push, the way display code does.
    fn lines_of(change: &ChangeSet) -> Vec<BudgetLine> {
        change
            .documents
            .iter()
            .map(|d| d.decode().unwrap())
            .collect()
    }

    fn next(sub: &Subscription<ChangeSet>) -> ChangeSet {
        sub.recv_timeout(Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn line_mutations_drive_the_change_feed_and_totals() {
        let app = App::in_memory();
        let cement = app.catalog().add("Cemento", 10.0, 100.0).unwrap();
        let sand = app.catalog().add("Arena", 5.0, 50.0).unwrap();
        let budget = app.budgets().create("Reforma cocina").unwrap();

        let feed = app.watch_lines_of(budget.id);
        assert!(next(&feed).documents.is_empty());

        app.lines().add_line(budget.id, cement.id, 2.0).unwrap();
        app.lines().add_line(budget.id, sand.id, 3.0).unwrap();
        app.budgets().set_labor_cost(budget.id, 20.0).unwrap();

        // Two pushes, one per line mutation; the last carries the full set.
        let _ = next(&feed);
        let lines = lines_of(&next(&feed));
        assert_eq!(lines.len(), 2);

        let totals = compute_totals(&lines, 20.0);
        assert_eq!(totals.materials_subtotal, 35.0);
        assert_eq!(totals.grand_total, 55.0);
        assert_eq!(app.totals_for(budget.id).unwrap(), totals);
    }

    #[test]
    fn lines_feed_is_scoped_to_its_budget() {
        let app = App::in_memory();
        let cement = app.catalog().add("Cemento", 10.0, 100.0).unwrap();
        let mine = app.budgets().create("Mía").unwrap();
        let other = app.budgets().create("Ajena").unwrap();

        let feed = app.watch_lines_of(mine.id);
        let _ = next(&feed);

        app.lines().add_line(other.id, cement.id, 5.0).unwrap();

        // The push triggered by the other budget's line carries an empty
        // result set for this scope.
        let change = next(&feed);
        assert!(change.documents.is_empty());
    }

    #[test]
    fn materials_feed_tracks_catalog_and_ledger_writes() {
        let app = App::in_memory();
        let feed = app.watch_materials();
        assert!(next(&feed).documents.is_empty());

        let cement = app.catalog().add("Cemento", 10.0, 100.0).unwrap();
        assert_eq!(next(&feed).documents.len(), 1);

        let budget = app.budgets().create("Obra").unwrap();
        app.lines().add_line(budget.id, cement.id, 30.0).unwrap();

        // The reservation rewrites the material document, so the catalog
        // watcher sees the new stock figure.
        let change = next(&feed);
        let stock = change.documents[0].fields["stock"].as_f64().unwrap();
        assert_eq!(stock, 70.0);
    }

    #[test]
    fn dropping_the_subscription_unsubscribes() {
        let app = App::in_memory();
        let feed = app.watch_budgets();
        drop(feed);

        // Mutations after the drop must not error against a dead feed.
        app.budgets().create("Obra").unwrap();
    }

    #[test]
    fn cascade_delete_empties_the_budget_feed_without_restoring_stock() {
        let app = App::in_memory();
        let cement = app.catalog().add("Cemento", 10.0, 100.0).unwrap();
        let budget = app.budgets().create("Obra").unwrap();
        app.lines().add_line(budget.id, cement.id, 30.0).unwrap();

        let budgets_feed = app.watch_budgets();
        let _ = next(&budgets_feed);

        app.delete_budget(budget.id).unwrap();

        assert!(next(&budgets_feed).documents.is_empty());
        assert_eq!(
            app.budgets().get(budget.id).unwrap_err(),
            DomainError::NotFound
        );
        assert_eq!(app.catalog().get(cement.id).unwrap().stock, 70.0);
    }

    #[test]
    fn deleting_a_material_leaves_lines_dangling_but_removable() {
        let app = App::in_memory();
        let cement = app.catalog().add("Cemento", 10.0, 100.0).unwrap();
        let budget = app.budgets().create("Obra").unwrap();
        let line = app.lines().add_line(budget.id, cement.id, 30.0).unwrap();

        app.catalog().remove(cement.id).unwrap();

        // The dangling line still totals with its snapshot price, and a
        // further quantity edit resolves the material as NotFound.
        assert_eq!(app.totals_for(budget.id).unwrap().materials_subtotal, 300.0);
        assert_eq!(
            app.lines()
                .edit_line_quantity(budget.id, line, 40.0)
                .unwrap_err(),
            DomainError::NotFound
        );

        app.lines().remove_line(budget.id, line).unwrap();
        assert!(app.lines().lines_for(budget.id).unwrap().is_empty());
    }

    #[test]
    fn labor_cost_alone_changes_the_grand_total() {
        let app = App::in_memory();
        let budget = app.budgets().create("Obra").unwrap();

        app.budgets().set_labor_cost(budget.id, 150.0).unwrap();

        let totals = app.totals_for(budget.id).unwrap();
        assert_eq!(totals.materials_subtotal, 0.0);
        assert_eq!(totals.grand_total, 150.0);
    }
}
