use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use document_analyzer::models::loaders::parse_prompt_table;
use document_analyzer::services::{InferenceService, ReportWriter};
use document_analyzer::{
    AnalysisDispatcher, Answers, App, AppError, AppResult, Console, Document, DocumentCollector,
    FileGroup, Mode, PromptTable, TextExtractor,
};
use tokio_test::{assert_err, assert_ok};

const PROMPTS: &str = r#"
[prompts]
1 = "Check the procurement justification against the contract."
2 = "List contract risks."
3 = "Summarize every document."
4 = "Find inconsistencies."
"#;

/// Reads the source file itself as its "OCR" text
#[derive(Clone, Default)]
struct FileContentExtractor {
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl TextExtractor for FileContentExtractor {
    async fn extract(&self, path: &Path) -> AppResult<String> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.calls.lock().unwrap().push(name);
        Ok(std::fs::read_to_string(path).unwrap())
    }
}

/// Records every request and answers with a canned string
#[derive(Clone, Default)]
struct RecordingInference {
    requests: Arc<Mutex<Vec<(String, Vec<Document>)>>>,
}

#[async_trait]
impl InferenceService for RecordingInference {
    async fn run_prompt(&self, template: &str, documents: &[Document]) -> AppResult<String> {
        let mut requests = self.requests.lock().unwrap();
        requests.push((template.to_string(), documents.to_vec()));
        Ok(format!("analysis #{}", requests.len()))
    }
}

fn prompts() -> PromptTable {
    parse_prompt_table(PROMPTS, Path::new("prompts.toml")).unwrap()
}

fn app(extractor: &FileContentExtractor, inference: &RecordingInference) -> App {
    App::new(
        DocumentCollector::new(Box::new(extractor.clone())),
        AnalysisDispatcher::new(prompts(), Box::new(inference.clone())),
    )
}

fn sample_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("contract_obgruntuvannya.pdf"),
        "Обґрунтування технічних та якісних характеристик",
    )
    .unwrap();
    std::fs::write(dir.path().join("dogovir_final.docx"), "Договір про закупівлю").unwrap();
    dir
}

async fn run_with_input(app: &App, input: &str) -> (AppResult<()>, String) {
    let mut console = Console::new(input.as_bytes(), Vec::new());
    let result = app.run(&mut console, Answers::default()).await;
    let (_, output) = console.into_inner();
    (result, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn test_single_mode_end_to_end() {
    let dir = sample_dir();
    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference);

    let input = format!("{}\n1\n", dir.path().display());
    let (result, output) = run_with_input(&app, &input).await;
    assert_ok!(result);

    assert_eq!(extractor.calls.lock().unwrap().len(), 2);

    let requests = inference.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (template, documents) = &requests[0];
    assert_eq!(template, "Check the procurement justification against the contract.");
    assert_eq!(
        documents,
        &vec![
            Document {
                name: "Justification".to_string(),
                text: "Обґрунтування технічних та якісних характеристик".to_string(),
            },
            Document {
                name: "Contract".to_string(),
                text: "Договір про закупівлю".to_string(),
            },
        ]
    );

    assert!(output.contains("Documents found: 2"));
    assert!(output.contains("=== Analysis result (mode 1) ===\nanalysis #1\n"));
}

#[tokio::test]
async fn test_multi_mode_runs_each_distinct_mode_once() {
    let dir = sample_dir();
    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference);

    let input = format!("{}\n3, 1, 3\n", dir.path().display());
    let (result, output) = run_with_input(&app, &input).await;
    assert_ok!(result);

    // One collection, one inference call per distinct mode
    assert_eq!(extractor.calls.lock().unwrap().len(), 2);
    let requests = inference.requests.lock().unwrap();
    let templates: Vec<_> = requests.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(
        templates,
        vec![
            "Check the procurement justification against the contract.",
            "Summarize every document."
        ]
    );
    assert!(requests.iter().all(|(_, docs)| docs.len() == 2));

    assert!(output.contains("=== Analysis result (mode 1) ==="));
    assert!(output.contains("=== Analysis result (mode 3) ==="));
}

#[tokio::test]
async fn test_invalid_mode_stops_before_collection() {
    let dir = sample_dir();
    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference);

    let input = format!("{}\n5\n", dir.path().display());
    let (result, output) = run_with_input(&app, &input).await;

    assert!(matches!(result, Err(AppError::InvalidMode { ref input }) if input == "5"));
    assert!(output.contains("Error: invalid mode"));
    assert!(extractor.calls.lock().unwrap().is_empty());
    assert!(inference.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_mode_input() {
    let dir = sample_dir();
    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference);

    let input = format!("{}\n   \n", dir.path().display());
    let (result, _) = run_with_input(&app, &input).await;
    assert!(matches!(result, Err(AppError::InvalidMode { .. })));
}

#[tokio::test]
async fn test_missing_directory_reported() {
    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference);

    let (result, output) = run_with_input(&app, "/nonexistent/tender\n1\n").await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
    assert!(output.contains("Error: not found: /nonexistent/tender"));
}

/// Role validation applies to single-mode runs too
#[tokio::test]
async fn test_single_mode_requires_both_roles() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("obgruntuvannya.pdf"), "J").unwrap();
    std::fs::write(dir.path().join("attachment.pdf"), "A").unwrap();

    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference);

    let input = format!("{}\n2\n", dir.path().display());
    let (result, _) = run_with_input(&app, &input).await;
    assert!(matches!(
        result,
        Err(AppError::MissingRequiredRole {
            role: FileGroup::Contract
        })
    ));
    assert!(extractor.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_additional_documents_keep_file_name() {
    let dir = sample_dir();
    std::fs::write(dir.path().join("specification.pdf"), "Специфікація").unwrap();

    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference);

    let input = format!("{}\n4\n", dir.path().display());
    let (result, _) = run_with_input(&app, &input).await;
    assert_ok!(result);

    let requests = inference.requests.lock().unwrap();
    let names: Vec<_> = requests[0].1.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Justification", "Contract", "specification.pdf"]);
}

#[tokio::test]
async fn test_preset_answers_skip_prompts_and_write_report() {
    let dir = sample_dir();
    let report_dir = tempfile::tempdir().unwrap();
    let report_path = report_dir.path().join("report.txt");

    let extractor = FileContentExtractor::default();
    let inference = RecordingInference::default();
    let app = app(&extractor, &inference).with_report(ReportWriter::with_path(&report_path));

    let mut console = Console::new(&b""[..], Vec::new());
    let answers = Answers {
        directory: Some(dir.path().display().to_string()),
        modes: Some("2".to_string()),
    };
    assert_ok!(app.run(&mut console, answers).await);

    let (_, output) = console.into_inner();
    let output = String::from_utf8(output).unwrap();
    assert!(!output.contains("Enter directory path"));

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("mode 2"));
    assert!(report.contains("analysis #1"));
}

#[test]
fn test_mode_try_from() {
    assert_ok!(Mode::try_from(4));
    assert_err!(Mode::try_from(5));
}
