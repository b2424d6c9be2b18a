use std::fs;
use std::path::{Path, PathBuf};

use compound_splitter::{
    CleanStage, Language, Lexicon, RankMethod, Splitter, SplitterConfig, VectorStore, evaluate,
};

struct Fixture {
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl Fixture {
    fn path(&self) -> &Path {
        &self.path
    }
}

fn lex_dir(lexicon: &str, stopwords: &str, suffixes: &str, prefixes: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().to_path_buf();
    fs::write(path.join("de.lexicon.tsv"), lexicon).unwrap();
    fs::write(path.join("de.stopwords.txt"), stopwords).unwrap();
    fs::write(path.join("de.suffixes.txt"), suffixes).unwrap();
    fs::write(path.join("de.prefixes.txt"), prefixes).unwrap();
    Fixture { _dir: dir, path }
}

fn german_splitter(config: SplitterConfig, fixture: &Fixture) -> Splitter {
    let lexicon = Lexicon::load(fixture.path(), &config).expect("load lexicon");
    Splitter::new(config, lexicon, None)
}

#[test]
fn krankenhaus_end_to_end() {
    let fixture = lex_dir("kranken 50\nhaus 200\nkrank 30\n", "", "", "");
    let mut config = SplitterConfig::new(Language::German);
    config.rankings = vec![RankMethod::MostKnown, RankMethod::Shortest];
    let splitter = german_splitter(config, &fixture);

    // Both parts fully known and fewest parts: beats krank|en+haus.
    assert_eq!(splitter.split_rendered("krankenhaus"), "kranken+haus");
    assert_eq!(splitter.split_rendered("Krankenhaus"), "kranken+haus");
}

#[test]
fn renders_binding_morphemes_with_pipes() {
    let fixture = lex_dir("arbeit 90\namt 0\narbeits 5\nplatz 80\n", "", "", "");
    let config = SplitterConfig::new(Language::German);
    let splitter = german_splitter(config, &fixture);
    let rendered = splitter.render(&[
        "arbeit".to_string(),
        "s".to_string(),
        "platz".to_string(),
    ]);
    assert_eq!(rendered, "arbeit|s+platz");
}

#[test]
fn out_of_vocabulary_word_stays_whole() {
    let fixture = lex_dir("haus 200\n", "", "", "");
    let splitter = german_splitter(SplitterConfig::new(Language::German), &fixture);
    assert_eq!(splitter.split_rendered("zeitgeist"), "zeitgeist");
}

#[test]
fn every_candidate_concatenates_back_to_the_word() {
    let fixture = lex_dir(
        "kranken 50\nhaus 200\nkrank 30\nkran 20\nwagen 40\n",
        "",
        "ung\n",
        "un\n",
    );
    let splitter = german_splitter(SplitterConfig::new(Language::German), &fixture);
    for word in ["krankenhaus", "krankenwagen", "kranwagenhaus", "hauswagen"] {
        let raw: Vec<_> = splitter.splits(word).collect();
        for split in &raw {
            assert_eq!(split.concat(), word);
        }
        for split in splitter.clean(raw) {
            assert_eq!(split.concat(), word);
        }
    }
}

#[test]
fn semantic_similarity_breaks_ranking_ties() {
    let fixture = lex_dir("stadt 90\nrand 50\nstrand 60\nsta 10\n", "", "", "");
    let mut config = SplitterConfig::new(Language::German);
    config.rankings = vec![RankMethod::SemanticSimilarity, RankMethod::Shortest];
    let vectors_dir = tempfile::tempdir().unwrap();
    let store_path = vectors_dir.path().join("de.vectors.json");
    fs::write(&store_path, r#"{"stadt": {"strand": 0.9}}"#).unwrap();
    let store = VectorStore::load(&store_path).unwrap();
    let lexicon = Lexicon::load(fixture.path(), &config).unwrap();
    let splitter = Splitter::new(config, lexicon, Some(store));

    // stadt+strand scores 0.45 average similarity; the one-part candidate
    // scores 0.
    assert_eq!(splitter.split_rendered("stadtstrand"), "stadt+strand");
}

#[test]
fn force_split_prefers_any_decomposition() {
    let fixture = lex_dir("krankenhaus 100\nkranken 50\nhaus 200\n", "", "", "");
    let mut config = SplitterConfig::new(Language::German);
    config.force_split = true;
    config.rankings = vec![RankMethod::MostKnown, RankMethod::Shortest];
    let splitter = german_splitter(config, &fixture);
    assert_eq!(splitter.split_rendered("krankenhaus"), "kranken+haus");
}

#[test]
fn cleaning_can_be_reduced_to_a_subset() {
    let fixture = lex_dir("kranken 50\nhaus 200\n", "", "", "");
    let mut config = SplitterConfig::new(Language::German);
    config.cleanings = vec![CleanStage::Fragments];
    let splitter = german_splitter(config, &fixture);
    let cleaned = splitter.clean(vec![vec!["krankenha".to_string(), "us".to_string()]]);
    assert!(cleaned.is_empty());
}

#[test]
fn evaluation_reports_percentages_and_errors() {
    let fixture = lex_dir("kranken 50\nhaus 200\nwagen 40\n", "", "", "");
    let splitter = german_splitter(SplitterConfig::new(Language::German), &fixture);

    let gold_dir = tempfile::tempdir().unwrap();
    let gold_path = gold_dir.path().join("gold.tsv");
    fs::write(
        &gold_path,
        "krankenhaus\tkranken+haus\n\
         krankenwagen\tkranken+wagen\n\
         xylophon\txylophon\n",
    )
    .unwrap();

    let report = evaluate(&splitter, &gold_path).unwrap();
    assert_eq!(report.true_positives, 2);
    assert_eq!(report.true_negatives, 1);
    assert_eq!(report.precision, 1.0);
    assert_eq!(report.recall, 1.0);
    assert_eq!(report.accuracy, 1.0);
    assert_eq!(report.coverage, 1.0);
    assert_eq!(report.errors.under + report.errors.over + report.errors.wrong, 0);

    // The JSON report round-trips through serde.
    let json = serde_json::to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["true_positives"], 2);
}

#[test]
fn evaluation_rejects_malformed_gold_lines() {
    let fixture = lex_dir("haus 200\n", "", "", "");
    let splitter = german_splitter(SplitterConfig::new(Language::German), &fixture);
    let gold_dir = tempfile::tempdir().unwrap();
    let gold_path = gold_dir.path().join("gold.tsv");
    fs::write(&gold_path, "only-one-field\n").unwrap();
    let err = evaluate(&splitter, &gold_path).unwrap_err();
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn swedish_and_hungarian_binding_morphemes() {
    let sv = SplitterConfig::new(Language::Swedish);
    assert!(sv.is_binding_morpheme("s"));
    assert!(!sv.is_binding_morpheme("en"));

    let hu = SplitterConfig::new(Language::Hungarian);
    assert!(hu.is_binding_morpheme("ó"));
    assert!(hu.is_binding_morpheme("ítő"));
}
