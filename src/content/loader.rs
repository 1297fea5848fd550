use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use super::catalog::Catalog;
use super::types::{Chapter, Role};

pub fn load_chapter(path: &Path) -> Result<Chapter> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let chapter: Chapter =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(chapter)
}

pub fn load_role(role_dir: &Path) -> Result<Vec<Chapter>> {
    let pattern = role_dir.join("chapter_*.toml");
    let pattern = pattern.to_string_lossy();
    let mut paths = glob::glob(&pattern)
        .with_context(|| format!("bad content path {}", role_dir.display()))?
        .collect::<Result<Vec<_>, _>>()?;

    // Sort by filename so chapter_01, chapter_02 come in order
    paths.sort();

    let mut chapters = Vec::with_capacity(paths.len());
    for path in paths {
        chapters.push(load_chapter(&path)?);
    }
    Ok(chapters)
}

pub fn load_catalog(root: &Path) -> Result<Catalog> {
    let mut roles = BTreeMap::new();
    for role in Role::ALL {
        let dir = root.join(role.key());
        if !dir.is_dir() {
            bail!("missing content directory {}", dir.display());
        }
        let chapters = load_role(&dir)?;
        log::debug!("loaded {} chapter(s) for {}", chapters.len(), role.key());
        roles.insert(role, chapters);
    }

    let catalog = Catalog::new(roles)
        .with_context(|| format!("invalid content in {}", root.display()))?;
    log::info!(
        "content catalog ready: {} scenarios from {}",
        catalog.scenario_count(),
        root.display()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Category, Prompt, ScenarioContent};
    use std::path::PathBuf;

    fn shipped_content() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content")
    }

    const MINI_CHAPTER: &str = r#"
number = 1
name = "Basics"
description = "First steps."

[[scenarios]]
id = "t_1"
category = "phishing"
difficulty = "easy"
setup = "An email arrives:"
question = "What now?"
correct = "b"
explanation = "It is phishing."
lesson = "Check the sender."

[scenarios.content]
type = "phone"
caller = "IT Support"
transcript = "Install this tool."

[[scenarios.choices]]
id = "a"
text = "Install it"

[[scenarios.choices]]
id = "b"
text = "Hang up and report"

[boss]
id = "b1"
name = "BOSS"
title = "Tester"
health = 50
dialogue = ["hi"]

[[boss.attacks]]
name = "Poke"
description = "A poke"
damage = 10

[boss.attacks.scenario]
category = "malware"
question = "Open it?"
correct = "a"

[boss.attacks.scenario.content]
type = "generic"
context = "A USB stick in the car park."

[[boss.attacks.scenario.choices]]
id = "a"
text = "No"

[[boss.attacks.scenario.choices]]
id = "b"
text = "Yes"
"#;

    #[test]
    fn loads_single_chapter_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter_01.toml");
        std::fs::write(&path, MINI_CHAPTER).unwrap();

        let chapter = load_chapter(&path).unwrap();
        assert_eq!(chapter.number, 1);
        assert_eq!(chapter.scenarios.len(), 1);
        assert!(matches!(chapter.scenarios[0].content, ScenarioContent::Phone(_)));
        assert_eq!(chapter.boss.attacks[0].scenario.category(), Category::Malware);
        assert_eq!(chapter.boss.avatar, None);
    }

    #[test]
    fn role_files_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("chapter_02.toml"),
            MINI_CHAPTER.replace("number = 1", "number = 2"),
        )
        .unwrap();
        std::fs::write(dir.path().join("chapter_01.toml"), MINI_CHAPTER).unwrap();
        std::fs::write(dir.path().join("notes.toml"), "not = 'a chapter'").unwrap();

        let chapters = load_role(dir.path()).unwrap();
        let numbers: Vec<u32> = chapters.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn unknown_category_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter_01.toml");
        std::fs::write(&path, MINI_CHAPTER.replace("\"malware\"", "\"astrology\"")).unwrap();
        assert!(load_chapter(&path).is_err());
    }

    #[test]
    fn missing_role_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(dir.path()).unwrap_err();
        assert!(err.to_string().contains("missing content directory"));
    }

    #[test]
    fn shipped_content_is_valid() {
        let catalog = load_catalog(&shipped_content()).unwrap();
        for role in Role::ALL {
            assert!(catalog.chapter_count(role) >= 1, "{role:?} has no chapters");
        }
        assert_eq!(catalog.chapter_count(Role::Employee), 2);
        assert_eq!(catalog.scenario_count(), 40);
    }

    #[test]
    fn every_shipped_prompt_has_exactly_one_correct_choice() {
        let catalog = load_catalog(&shipped_content()).unwrap();
        for role in Role::ALL {
            for chapter in catalog.chapters(role) {
                for scenario in &chapter.scenarios {
                    let hits = scenario
                        .choices
                        .iter()
                        .filter(|c| c.id == scenario.correct)
                        .count();
                    assert_eq!(hits, 1, "{}", scenario.id);
                }
                for attack in &chapter.boss.attacks {
                    let hits = attack
                        .scenario
                        .choices()
                        .iter()
                        .filter(|c| c.id == attack.scenario.correct())
                        .count();
                    assert_eq!(hits, 1, "{}", attack.name);
                }
            }
        }
    }
}
