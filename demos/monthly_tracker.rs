//! Monthly remittance tracker walkthrough

use remittance_tracker::utils::{
    date_label, format_yen, month_year_label, progress_label, status_label, toggle_label,
    SystemClock,
};
use remittance_tracker::{
    observability, share, Clock, Ledger, LogNotifier, OverdueMonitor, TrackerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init();

    let config = match std::env::args().nth(1) {
        Some(path) => TrackerConfig::from_file(path)?,
        None => TrackerConfig::default(),
    };

    let mut ledger = Ledger::from_config(SystemClock, &config)?;

    // Mark the two oldest months as sent
    let oldest: Vec<_> = ledger.keys().take(2).collect();
    for key in oldest {
        ledger.toggle(key)?;
    }

    println!("仕送り確認アプリ\n");
    for view in ledger.records_for_display() {
        println!(
            "  {:<10} {:>10}  {:<6} [{}]",
            month_year_label(view.record.key),
            format_yen(&view.record.amount),
            status_label(view.status),
            toggle_label(view.record.completed),
        );
    }

    let summary = ledger.summary();
    println!();
    println!("  {}", progress_label(&summary));
    println!("  期限超過: {}", summary.overdue_count);
    println!("  振込済み合計: {}", format_yen(&summary.total_completed_amount));
    println!("  最終更新: {}", date_label(ledger.now().date()));

    // One round of overdue checks, then tear the monitor down
    let shared = share(ledger);
    let monitor = OverdueMonitor::start(shared.clone(), LogNotifier, config.check_interval());
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    monitor.shutdown().await;

    let now = SystemClock.now();
    println!("\n  {} 件の月が期限超過です", shared.read().await.overdue_keys_at(now).len());

    Ok(())
}
