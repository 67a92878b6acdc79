use anyhow::Context;
use camino::Utf8Path;
use selfexpose_types::ExposureRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// All records collected from one tree, in discovery order.
///
/// Duplicate ids are kept; deciding what they mean is the reporter's job.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExposureRepository {
    records: Vec<ExposureRecord>,
}

impl ExposureRepository {
    pub fn new(records: Vec<ExposureRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ExposureRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ExposureRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record declaring `id`, in discovery order.
    pub fn by_id(&self, id: &str) -> Vec<&ExposureRecord> {
        self.records.iter().filter(|r| r.id == id).collect()
    }

    pub fn ids(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.id.as_str()).collect()
    }

    /// Snapshot text: a pretty-printed JSON array with a trailing newline.
    pub fn snapshot_json(&self) -> anyhow::Result<String> {
        let mut text =
            serde_json::to_string_pretty(&self.records).context("serialize snapshot")?;
        text.push('\n');
        Ok(text)
    }

    pub fn write_snapshot(&self, path: &Utf8Path) -> anyhow::Result<()> {
        write_text(path, &self.snapshot_json()?)
    }

    /// Component graph: components, their files and their dependency edges.
    pub fn component_graph(&self) -> ComponentGraph {
        let declared = self.ids();
        let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
        let mut edges: BTreeSet<GraphEdge> = BTreeSet::new();

        for record in &self.records {
            nodes.entry(record.id.clone()).or_insert_with(|| GraphNode {
                id: record.id.clone(),
                node_type: "component".to_string(),
                name: record.name.clone(),
                kind: Some(record.kind.to_string()),
                version: Some(record.version.clone()),
            });

            let file_id = format!("file:{}", record.source_path);
            nodes.entry(file_id.clone()).or_insert_with(|| GraphNode {
                id: file_id.clone(),
                node_type: "file".to_string(),
                name: record.source_path.to_string(),
                kind: None,
                version: None,
            });
            edges.insert(GraphEdge {
                source: record.id.clone(),
                target: file_id,
                relation: "contains".to_string(),
            });

            for dep in record.dependencies() {
                let target = if declared.contains(dep.as_str()) {
                    dep.clone()
                } else {
                    let dep_id = format!("component_dep:{dep}");
                    nodes.entry(dep_id.clone()).or_insert_with(|| GraphNode {
                        id: dep_id.clone(),
                        node_type: "component_dep".to_string(),
                        name: dep.clone(),
                        kind: None,
                        version: None,
                    });
                    dep_id
                };
                edges.insert(GraphEdge {
                    source: record.id.clone(),
                    target,
                    relation: "depends_on".to_string(),
                });
            }
        }

        let nodes: Vec<GraphNode> = nodes.into_values().collect();
        let edges: Vec<GraphEdge> = edges.into_iter().collect();
        let metadata = GraphMetadata {
            components: declared.len() as u32,
            files: nodes.iter().filter(|n| n.node_type == "file").count() as u32,
            nodes: nodes.len() as u32,
            edges: edges.len() as u32,
        };
        ComponentGraph {
            nodes,
            edges,
            metadata,
        }
    }

    pub fn write_component_graph(&self, path: &Utf8Path) -> anyhow::Result<()> {
        let mut text = serde_json::to_string_pretty(&self.component_graph())
            .context("serialize component graph")?;
        text.push('\n');
        write_text(path, &text)
    }
}

impl From<Vec<ExposureRecord>> for ExposureRepository {
    fn from(records: Vec<ExposureRecord>) -> Self {
        Self::new(records)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ComponentGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphMetadata {
    pub components: u32,
    pub files: u32,
    pub nodes: u32,
    pub edges: u32,
}

fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfexpose_types::{ExposureKind, Needs, Provides, RepoPath};

    fn record(id: &str, file: &str, deps: &[&str]) -> ExposureRecord {
        ExposureRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            kind: ExposureKind::Component,
            version: "1.0.0".to_string(),
            needs: Needs {
                dependencies: deps.iter().map(|d| d.to_string()).collect(),
                resources: Default::default(),
            },
            provides: Provides::default(),
            source_path: RepoPath::new(file),
        }
    }

    #[test]
    fn keeps_duplicates_in_discovery_order() {
        let repo = ExposureRepository::new(vec![
            record("a", "x/a.py", &[]),
            record("b", "x/b.py", &[]),
            record("a", "y/a.py", &[]),
        ]);
        assert_eq!(repo.len(), 3);
        let files: Vec<&str> = repo
            .by_id("a")
            .iter()
            .map(|r| r.source_path.as_str())
            .collect();
        assert_eq!(files, vec!["x/a.py", "y/a.py"]);
        assert_eq!(repo.ids().into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(repo.by_id("zzz").is_empty());
    }

    #[test]
    fn empty_snapshot_is_an_empty_array() {
        let repo = ExposureRepository::default();
        assert_eq!(repo.snapshot_json().expect("json"), "[]\n");
    }

    #[test]
    fn snapshot_is_stable_and_ends_with_newline() {
        let repo = ExposureRepository::new(vec![record("a", "a.py", &["b"])]);
        let first = repo.snapshot_json().expect("json");
        let second = repo.snapshot_json().expect("json");
        assert_eq!(first, second);
        assert!(first.ends_with("]\n"));
        assert!(first.contains("\"source_file\": \"a.py\""));
    }

    #[test]
    fn component_graph_marks_undeclared_dependencies() {
        let repo = ExposureRepository::new(vec![
            record("a", "a.py", &["b", "ghost"]),
            record("b", "b.py", &[]),
        ]);
        let graph = repo.component_graph();

        let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["a", "b", "component_dep:ghost", "file:a.py", "file:b.py"]
        );
        assert!(graph.edges.contains(&GraphEdge {
            source: "a".to_string(),
            target: "component_dep:ghost".to_string(),
            relation: "depends_on".to_string(),
        }));
        assert!(graph.edges.contains(&GraphEdge {
            source: "a".to_string(),
            target: "b".to_string(),
            relation: "depends_on".to_string(),
        }));
        assert_eq!(graph.metadata.components, 2);
        assert_eq!(graph.metadata.files, 2);
        assert_eq!(graph.metadata.edges, 4);
    }

    #[test]
    fn writes_snapshot_into_missing_directories() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let out = camino::Utf8PathBuf::from_path_buf(tmp.path().join("out/snap.json"))
            .expect("utf8 path");
        let repo = ExposureRepository::new(vec![record("a", "a.py", &[])]);
        repo.write_snapshot(&out).expect("write");
        let text = std::fs::read_to_string(&out).expect("read");
        assert_eq!(text, repo.snapshot_json().expect("json"));
    }
}
