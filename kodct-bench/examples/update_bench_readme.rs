use serde::Deserialize;
use std::error::Error;
use std::fs;

#[derive(Deserialize)]
struct BenchFile {
    env: EnvInfo,
    results: Vec<BenchRecord>,
}

#[derive(Deserialize)]
struct EnvInfo {
    cpu: String,
    rustc: String,
    flags: String,
    date: String,
    runner: String,
}

#[derive(Deserialize)]
struct BenchRecord {
    transform: String,
    size: usize,
    mode: String,
    time_per_op_ns: f64,
    ops_per_sec: f64,
    #[serde(default)]
    best: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let data = fs::read_to_string("../benchmarks/latest.json")?;
    let bf: BenchFile = serde_json::from_str(&data)?;

    let mut table = format!(
        "Last run: {} on {} ({}; {}; flags: `{}`)\n\n",
        bf.env.date,
        bf.env.runner,
        bf.env.cpu.trim(),
        bf.env.rustc,
        bf.env.flags
    );
    table.push_str("| Transform | Size (N) | Mode | Time/op | Ops/sec |\n");
    table.push_str("| --- | --- | --- | --- | --- |\n");
    for r in &bf.results {
        let time_us = r.time_per_op_ns / 1_000.0;
        let mode = if r.best {
            format!("**{}**", r.mode)
        } else {
            r.mode.clone()
        };
        table.push_str(&format!(
            "| {} | {} | {} | {:.2} µs | {:.1} |\n",
            r.transform, r.size, mode, time_us, r.ops_per_sec
        ));
    }
    update_readme(&table)
}

fn update_readme(table: &str) -> Result<(), Box<dyn Error>> {
    let path = "../README.md";
    let content = fs::read_to_string(path)?;
    let start = "<!-- BENCH_START -->";
    let end = "<!-- BENCH_END -->";
    if let (Some(s), Some(e)) = (content.find(start), content.find(end)) {
        let mut new_content = String::new();
        new_content.push_str(&content[..s + start.len()]);
        new_content.push('\n');
        new_content.push_str(table);
        new_content.push_str(&content[e..]);
        fs::write(path, new_content)?;
    }
    Ok(())
}
