#![allow(dead_code)]

use std::fs;
use std::path::Path;

use sales_reports::config::ReportConfig;
use tempfile::TempDir;

/// Temporary data directory laid out like the default `files` directory
pub struct DataDir {
    pub dir: TempDir,
    pub config: ReportConfig,
}

impl DataDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = ReportConfig::in_dir(dir.path());
        Self { dir, config }
    }

    /// Copy a dataset from `tests/fixtures/<name>`
    pub fn from_fixture(name: &str) -> Self {
        let data = Self::new();
        let source = Path::new("tests/fixtures").join(name);
        for entry in fs::read_dir(&source).expect("Missing fixture directory") {
            let entry = entry.unwrap();
            fs::copy(entry.path(), data.dir.path().join(entry.file_name())).unwrap();
        }
        data
    }

    pub fn write_sellers(&self, lines: &[&str]) {
        write_lines(&self.config.seller_file, lines);
    }

    pub fn write_products(&self, lines: &[&str]) {
        write_lines(&self.config.product_file, lines);
    }

    /// Write a sales file with the `CC;<document_id>` header followed by `lines`
    pub fn write_sales(&self, document_id: &str, lines: &[&str]) {
        let header = format!("CC;{}", document_id);
        let mut all = vec![header.as_str()];
        all.extend_from_slice(lines);
        write_lines(&self.config.sales_file(document_id), &all);
    }

    pub fn seller_report(&self) -> String {
        fs::read_to_string(&self.config.seller_report).expect("Seller report not written")
    }

    pub fn product_report(&self) -> String {
        fs::read_to_string(&self.config.product_report).expect("Product report not written")
    }
}

pub fn write_lines(path: &Path, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(path, content).expect("Failed to write test file");
}

/// Trailing integer of every report line
pub fn totals_column(report: &str) -> Vec<u64> {
    report
        .lines()
        .map(|line| line.rsplit(';').next().unwrap().parse().unwrap())
        .collect()
}

/// Assert totals never increase and equal totals form one contiguous block
pub fn assert_ranked(report: &str) {
    let totals = totals_column(report);
    for pair in totals.windows(2) {
        assert!(
            pair[0] >= pair[1],
            "Report is not sorted descending:\n{}",
            report
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_sales_adds_header() {
        let data = DataDir::new();
        data.write_sales("42", &["1;3"]);

        let content = fs::read_to_string(data.config.sales_file("42")).unwrap();
        assert_eq!(content, "CC;42\n1;3\n");
    }

    #[test]
    fn test_totals_column() {
        assert_eq!(totals_column("Laptop;100;3\nMouse;5;0\n"), vec![3, 0]);
    }
}
