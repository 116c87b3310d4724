//! End-to-end library test: index a docs folder with fake providers, save
//! and reload the store, retrieve, and answer with citations.

use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

use ragkit::config::Config;
use ragkit::index_cmd::{build_index, IndexOptions};
use ragkit::search::{answer_from_store, retrieve};
use ragkit_core::chat::{ChatMessage, ChatProvider};
use ragkit_core::embedding::EmbeddingProvider;
use ragkit_core::store::{load_store, save_store};

const VOCABULARY: [&str; 4] = ["deploy", "cat", "rust", "cargo"];

/// Counts vocabulary words, so related texts share a direction.
struct KeywordEmbedder;

impl EmbeddingProvider for KeywordEmbedder {
    fn model_name(&self) -> &str {
        "keyword"
    }

    fn embed(&self, texts: &[String]) -> ragkit_core::Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                VOCABULARY
                    .iter()
                    .map(|word| lower.matches(word).count() as f32)
                    .collect()
            })
            .collect())
    }
}

/// Answers by citing the first tag it finds in the prompt.
struct CitingChat {
    prompts: Mutex<Vec<String>>,
}

impl ChatProvider for CitingChat {
    fn model_name(&self) -> &str {
        "citing"
    }

    fn chat(&self, messages: &[ChatMessage], _temperature: f32) -> ragkit_core::Result<String> {
        let prompt = messages[0].content.clone();
        let context = prompt.split("Context:\n").nth(1).unwrap_or_default();
        let tag_end = context.find(']').map(|i| i + 1).unwrap_or(0);
        let tag = &context[..tag_end];
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(format!("  Run the deploy script {}.  ", tag))
    }
}

fn write_docs(tmp: &TempDir) -> std::path::PathBuf {
    let docs = tmp.path().join("docs");
    fs::create_dir_all(docs.join("ops")).unwrap();
    fs::write(docs.join("cats.txt"), "The cat sat on the mat. A cat naps.").unwrap();
    fs::write(
        docs.join("ops").join("deploy.md"),
        "To deploy, run the deploy script.",
    )
    .unwrap();
    fs::write(docs.join("notes.rs"), "fn main() {}").unwrap();
    docs
}

#[test]
fn test_index_search_and_answer() {
    let tmp = TempDir::new().unwrap();
    let docs = write_docs(&tmp);
    let store = tmp.path().join("data").join("vectorstore.json");

    let entries = build_index(
        &KeywordEmbedder,
        &Config::default(),
        &docs,
        &IndexOptions::default(),
    )
    .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].source, "cats.txt");
    assert_eq!(entries[1].source, "deploy.md");
    assert_eq!(
        entries.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![0, 1]
    );

    save_store(&store, &entries).unwrap();
    assert_eq!(load_store(&store).unwrap(), entries);

    let results = retrieve(&KeywordEmbedder, &store, "how do I deploy?", 1).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source, "deploy.md");
    assert_eq!(results[0].id, 1);
    assert!((results[0].score - 1.0).abs() < 1e-6);

    let chat = CitingChat {
        prompts: Mutex::new(Vec::new()),
    };
    let answer = answer_from_store(&KeywordEmbedder, &chat, &store, "how do I deploy?", 1).unwrap();
    assert_eq!(answer.text, "Run the deploy script [deploy.md:1].");
    assert_eq!(answer.citations, vec!["deploy.md:1".to_string()]);

    let prompts = chat.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("[deploy.md:1] To deploy, run the deploy script."));
    assert!(prompts[0].ends_with("Question: how do I deploy?\nAnswer:"));
}

#[test]
fn test_small_chunks_produce_overlapping_entries() {
    let tmp = TempDir::new().unwrap();
    let docs = write_docs(&tmp);

    let opts = IndexOptions {
        chunk_size: Some(10),
        overlap: Some(3),
        batch_size: Some(2),
    };
    let entries = build_index(&KeywordEmbedder, &Config::default(), &docs, &opts).unwrap();

    // 35 chars -> starts 0,7,14,21,28; 33 chars -> starts 0,7,14,21,28
    assert_eq!(entries.len(), 10);
    assert!(entries.iter().all(|e| e.text.chars().count() <= 10));
    assert_eq!(entries[0].text, "The cat sa");
    assert_eq!(entries[1].text, " sat on th");
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.id, i as u64);
    }
}

#[test]
fn test_retrieve_top_k_larger_than_store() {
    let tmp = TempDir::new().unwrap();
    let docs = write_docs(&tmp);
    let store = tmp.path().join("store.json");

    let entries = build_index(
        &KeywordEmbedder,
        &Config::default(),
        &docs,
        &IndexOptions::default(),
    )
    .unwrap();
    save_store(&store, &entries).unwrap();

    let results = retrieve(&KeywordEmbedder, &store, "cat", 50).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source, "cats.txt");
    assert!(results[0].score >= results[1].score);
}
