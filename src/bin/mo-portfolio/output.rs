use tabled::{builder::Builder, Table};

use mo_portfolio::objective::{Objective, ObjectiveVector};
use mo_portfolio::Report;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: OutputFormat, report: &Report) {
    match format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => print_tables(report),
    }
}

fn print_json(report: &Report) {
    match report.to_json() {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

fn print_tables(report: &Report) {
    let mut summary = Builder::default();
    summary.push_record(["Field", "Value"]);
    summary.push_record(["Method".to_string(), report.method.to_string()]);
    if let Some(opt) = &report.optimized {
        summary.push_record([
            format!("Optimized ({:?})", opt.sense).to_lowercase(),
            format!("{}: {:.6}", opt.objective, opt.value),
        ]);
    }
    if let Some(r) = &report.reference {
        summary.push_record(["Achievement".to_string(), format!("{:.6}", r.achievement)]);
    }
    summary.push_record(["Portfolio beta".to_string(), format!("{:.6}", report.beta)]);
    summary.push_record(["Sum of weights".to_string(), format!("{:.6}", report.sum_weights)]);
    summary.push_record(["Feasible".to_string(), report.feasible.to_string()]);
    println!("{}", Table::from(summary));

    let mut objectives = Builder::default();
    let mut header = vec!["Objective".to_string(), "Value".to_string()];
    let mut columns: Vec<&ObjectiveVector> = vec![&report.objectives];
    if let Some(r) = &report.reference {
        header.extend(["Reference", "Ideal", "Nadir", "Normalized"].map(String::from));
        columns.extend([&r.reference, &r.ideal, &r.nadir, &r.normalized_objectives]);
    }
    objectives.push_record(header);
    for o in Objective::ALL {
        let mut row = vec![o.name().to_string()];
        row.extend(columns.iter().map(|v| format!("{:.6}", v[o])));
        objectives.push_record(row);
    }
    println!("\n{}", Table::from(objectives));

    if let Some(r) = &report.reference {
        let mut payoff = Builder::default();
        let mut header = vec!["Optimized".to_string()];
        header.extend(Objective::ALL.iter().map(|o| o.name().to_string()));
        payoff.push_record(header);
        for row in r.payoff.rows() {
            let mut record = vec![row.objective.name().to_string()];
            record.extend(row.values.as_slice().iter().map(|v| format!("{:.6}", v)));
            payoff.push_record(record);
        }
        println!("\nPayoff table:\n{}", Table::from(payoff));
        for row in r.payoff.rows() {
            if let Some(w) = &row.warning {
                println!("  - {}", w);
            }
        }
    }

    let mut holdings = Builder::default();
    holdings.push_record(["Company", "Weight"]);
    for h in &report.holdings {
        holdings.push_record([h.company.clone(), format!("{:.6}", h.weight)]);
    }
    println!("\n{}", Table::from(holdings));

    if !report.violations.is_empty() {
        println!("\nViolations:");
        for v in &report.violations {
            println!("  - {}", v);
        }
    }
}
