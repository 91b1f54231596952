//! Demo binary: seeds an in-memory store and walks one budget through its
//! lifecycle, logging every step. Useful as a smoke run (`RUST_LOG=debug`).

use anyhow::Result;
use tracing::info;

use obraplan_app::App;

fn main() -> Result<()> {
    obraplan_observability::init();

    let app = App::in_memory();

    let cement = app.catalog().add("Cemento", 10.0, 100.0)?;
    let sand = app.catalog().add("Arena", 5.0, 50.0)?;
    info!(materials = 2, "catalog seeded");

    let budget = app.budgets().create("Reforma cocina")?;
    let cement_line = app.lines().add_line(budget.id, cement.id, 30.0)?;
    app.lines().add_line(budget.id, sand.id, 3.0)?;
    app.budgets().set_labor_cost(budget.id, 250.0)?;

    app.lines().edit_line_quantity(budget.id, cement_line, 50.0)?;

    // Overcommit is rejected and leaves everything untouched.
    if let Err(e) = app.lines().add_line(budget.id, cement.id, 60.0) {
        info!(error = %e, "reservation blocked");
    }

    let totals = app.totals_for(budget.id)?;
    info!(
        materials_subtotal = totals.materials_subtotal,
        labor_cost = totals.labor_cost,
        grand_total = totals.grand_total,
        "budget totals"
    );

    for material in app.catalog().list()? {
        info!(name = %material.name, stock = material.stock, "closing stock");
    }

    Ok(())
}
