//! Parsed runs indexed by their controlling parameter.
//!
//! Directories are scanned for `*.txt` dumps whose file stem names the
//! parameter. Files are parsed in parallel; the maps are filled afterwards,
//! so no locking is involved.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{AnalysisError, FormatError, FormatErrorKind, LookupError, Result};
use crate::model::{MethodErrorSeries, ParamKey, SimulationRun, Snapshot, SortOrder};
use crate::parser::{
    file_stem, param_from_path, parse_positional_file, parse_series_file, parse_timings_file,
    source_name,
};

const DUMP_EXTENSION: &str = "txt";

/// Positional runs keyed by timestep, with aligned lookups across runs.
#[derive(Debug, Clone, Default)]
pub struct TimeAlignedStore {
    runs: BTreeMap<ParamKey, SimulationRun>,
}

impl TimeAlignedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_runs(runs: impl IntoIterator<Item = (f64, SimulationRun)>) -> Self {
        Self {
            runs: runs.into_iter().map(|(p, r)| (ParamKey(p), r)).collect(),
        }
    }

    /// Load every `<delta_t>.txt` in `dir`.
    pub fn load_dir(dir: &Path, ball_count: usize) -> Result<Self> {
        let files = keyed_dumps(dir)?;

        let runs = files
            .par_iter()
            .map(|(param, path)| -> Result<(ParamKey, SimulationRun)> {
                let run = parse_positional_file(path, ball_count)?;
                debug!(%param, snapshots = run.len(), "loaded positional run");
                Ok((*param, run))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            runs: runs.into_iter().collect(),
        })
    }

    pub fn insert(&mut self, param: f64, run: SimulationRun) {
        self.runs.insert(ParamKey(param), run);
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Stored parameter values, explicitly sorted.
    pub fn params(&self, order: SortOrder) -> Vec<f64> {
        let mut keys: Vec<ParamKey> = self.runs.keys().copied().collect();
        order.sort(&mut keys);
        keys.into_iter().map(ParamKey::value).collect()
    }

    pub fn run(&self, param: f64) -> Result<&SimulationRun, LookupError> {
        self.runs
            .get(&ParamKey(param))
            .ok_or(LookupError::UnknownParam(param))
    }

    /// Snapshot of run `param` at exactly `timestamp`.
    pub fn lookup(&self, param: f64, timestamp: f64) -> Result<&Snapshot, LookupError> {
        self.run(param)?
            .at(timestamp)
            .ok_or(LookupError::UnknownTimestamp { param, timestamp })
    }

    /// Ascending timestamps present in both runs.
    ///
    /// Both runs are sampled on the simulator's fixed output interval, so an
    /// empty overlap means the inputs do not belong together.
    pub fn common_timestamps(&self, a: f64, b: f64) -> Result<Vec<f64>> {
        let left = self.run(a)?.snapshots();
        let right = self.run(b)?.snapshots();

        let mut common = Vec::with_capacity(left.len().min(right.len()));
        let (mut i, mut j) = (0, 0);
        while i < left.len() && j < right.len() {
            match left[i].time.total_cmp(&right[j].time) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    common.push(left[i].time);
                    i += 1;
                    j += 1;
                }
            }
        }

        if common.is_empty() {
            return Err(AnalysisError::Alignment {
                a: a.to_string(),
                b: b.to_string(),
            });
        }
        Ok(common)
    }
}

/// Error series keyed by method name and, when known, timestep.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    series: BTreeMap<String, BTreeMap<Option<ParamKey>, MethodErrorSeries>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a method tree.
    ///
    /// `dir/<method>/<delta_t>.txt` files are keyed by both; top-level
    /// `dir/<stem>.txt` files are keyed by timestep when the stem is a float,
    /// otherwise by method name alone.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut jobs: Vec<(SeriesKey, PathBuf)> = Vec::new();
        for path in sorted_entries(dir)? {
            if path.is_dir() {
                let method = file_name(&path);
                for file in dump_files(&path)? {
                    let key = (method.clone(), Some(param_from_path(&file)?));
                    jobs.push((key, file));
                }
            } else if is_dump(&path) {
                let key = match param_from_path(&path) {
                    Ok(param) => (String::new(), Some(param)),
                    Err(_) => (file_stem(&path), None),
                };
                jobs.push((key, path));
            }
        }
        if jobs.is_empty() {
            return Err(AnalysisError::EmptyDataset {
                path: dir.to_path_buf(),
            });
        }
        reject_duplicates(&jobs, |(_, delta_t)| delta_t.map_or(f64::NAN, ParamKey::value))?;

        let parsed = jobs
            .par_iter()
            .map(|(key, path)| -> Result<(SeriesKey, MethodErrorSeries)> {
                let series = parse_series_file(path)?;
                debug!(method = %key.0, rows = series.len(), "loaded error series");
                Ok((key.clone(), series))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut store = Self::new();
        for ((method, delta_t), series) in parsed {
            store
                .series
                .entry(method)
                .or_default()
                .insert(delta_t, series);
        }
        Ok(store)
    }

    pub fn insert(&mut self, method: &str, delta_t: Option<f64>, series: MethodErrorSeries) {
        self.series
            .entry(method.to_string())
            .or_default()
            .insert(delta_t.map(ParamKey), series);
    }

    /// Method names in lexical order. Timestep-only files sit under `""`.
    pub fn methods(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    /// Timesteps recorded for `method`, explicitly sorted.
    pub fn delta_ts(&self, method: &str, order: SortOrder) -> Result<Vec<f64>, LookupError> {
        let runs = self
            .series
            .get(method)
            .ok_or_else(|| LookupError::UnknownMethod(method.to_string()))?;
        let mut keys: Vec<ParamKey> = runs.keys().flatten().copied().collect();
        order.sort(&mut keys);
        Ok(keys.into_iter().map(ParamKey::value).collect())
    }

    pub fn get(
        &self,
        method: &str,
        delta_t: Option<f64>,
    ) -> Result<&MethodErrorSeries, LookupError> {
        let runs = self
            .series
            .get(method)
            .ok_or_else(|| LookupError::UnknownMethod(method.to_string()))?;
        runs.get(&delta_t.map(ParamKey))
            .ok_or_else(|| LookupError::UnknownSeries {
                method: method.to_string(),
                delta_t: delta_t.unwrap_or(f64::NAN),
            })
    }

    pub fn len(&self) -> usize {
        self.series.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Elapsed-time samples keyed by the parameter in each file name.
#[derive(Debug, Clone, Default)]
pub struct TimingSet {
    samples: BTreeMap<ParamKey, Vec<f64>>,
}

impl TimingSet {
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let files = keyed_dumps(dir)?;

        let samples = files
            .par_iter()
            .map(|(param, path)| -> Result<(ParamKey, Vec<f64>)> {
                Ok((*param, parse_timings_file(path)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            samples: samples.into_iter().collect(),
        })
    }

    pub fn insert(&mut self, param: f64, samples: Vec<f64>) {
        self.samples.insert(ParamKey(param), samples);
    }

    /// `(param, samples)` pairs sorted in `order`.
    pub fn entries(&self, order: SortOrder) -> Vec<(f64, &[f64])> {
        let mut keys: Vec<ParamKey> = self.samples.keys().copied().collect();
        order.sort(&mut keys);
        keys.into_iter()
            .map(|k| (k.value(), self.samples[&k].as_slice()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Method name and, when the file names one, timestep.
type SeriesKey = (String, Option<ParamKey>);

/// `*.txt` files in `dir` paired with the parameter in their names.
fn keyed_dumps(dir: &Path) -> Result<Vec<(ParamKey, PathBuf)>> {
    let files = dump_files(dir)?;
    if files.is_empty() {
        return Err(AnalysisError::EmptyDataset {
            path: dir.to_path_buf(),
        });
    }
    let keyed = files
        .into_iter()
        .map(|path| -> Result<(ParamKey, PathBuf)> { Ok((param_from_path(&path)?, path)) })
        .collect::<Result<Vec<_>>>()?;
    reject_duplicates(&keyed, |param| param.value())?;
    Ok(keyed)
}

/// Fails when two file names parse to the same key (`0.00001.txt` and
/// `1e-05.txt`), naming both files.
fn reject_duplicates<K: Ord>(keyed: &[(K, PathBuf)], param: impl Fn(&K) -> f64) -> Result<()> {
    let mut seen: BTreeMap<&K, &Path> = BTreeMap::new();
    for (key, path) in keyed {
        if let Some(first) = seen.insert(key, path.as_path()) {
            let kind = FormatErrorKind::DuplicateParam {
                param: param(key),
                first: source_name(first),
            };
            return Err(FormatError::new(source_name(path), 0, kind).into());
        }
    }
    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| AnalysisError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()).map_err(|e| AnalysisError::io(dir, e)))
        .collect::<Result<Vec<_>>>()?;
    paths.sort();
    Ok(paths)
}

fn dump_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(sorted_entries(dir)?
        .into_iter()
        .filter(|p| p.is_file() && is_dump(p))
        .collect())
}

fn is_dump(path: &Path) -> bool {
    path.extension().map(|e| e == DUMP_EXTENSION).unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BodyPosition;
    use tempfile::tempdir;

    fn run(times: &[f64]) -> SimulationRun {
        SimulationRun::new(
            times
                .iter()
                .map(|&t| Snapshot::new(t, vec![BodyPosition::new(t, t)]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let store = TimeAlignedStore::from_runs([(0.01, run(&[0.0, 0.01]))]);
        assert_eq!(store.lookup(0.01, 0.01).unwrap().time, 0.01);
        assert_eq!(store.lookup(0.1, 0.0), Err(LookupError::UnknownParam(0.1)));
        assert_eq!(
            store.lookup(0.01, 0.5),
            Err(LookupError::UnknownTimestamp {
                param: 0.01,
                timestamp: 0.5
            })
        );
    }

    #[test]
    fn test_common_timestamps_intersection() {
        let store = TimeAlignedStore::from_runs([
            (0.01, run(&[0.0, 0.01, 0.02, 0.03])),
            (0.001, run(&[0.01, 0.02, 0.04])),
        ]);
        assert_eq!(store.common_timestamps(0.01, 0.001).unwrap(), vec![0.01, 0.02]);
    }

    #[test]
    fn test_common_timestamps_requires_overlap() {
        let store =
            TimeAlignedStore::from_runs([(0.01, run(&[0.0, 0.01])), (0.001, run(&[0.5]))]);
        assert!(matches!(
            store.common_timestamps(0.01, 0.001),
            Err(AnalysisError::Alignment { .. })
        ));
        assert!(matches!(
            store.common_timestamps(0.01, 7.0),
            Err(AnalysisError::Lookup(LookupError::UnknownParam(_)))
        ));
    }

    #[test]
    fn test_params_sorted_both_ways() {
        let store = TimeAlignedStore::from_runs([
            (0.001, run(&[0.0])),
            (0.1, run(&[0.0])),
            (0.01, run(&[0.0])),
        ]);
        assert_eq!(store.params(SortOrder::Ascending), vec![0.001, 0.01, 0.1]);
        assert_eq!(store.params(SortOrder::Descending), vec![0.1, 0.01, 0.001]);
    }

    #[test]
    fn test_load_dir_parses_every_dump() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.01.txt"), "0.0\n1 2\n0.01\n1 2\n").unwrap();
        fs::write(dir.path().join("1e-05.txt"), "0.0\n1 2\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let store = TimeAlignedStore::load_dir(dir.path(), 1).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.run(0.00001).unwrap().len(), 1);
        assert_eq!(store.run(0.01).unwrap().len(), 2);
    }

    #[test]
    fn test_load_dir_rejects_empty_directory() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            TimeAlignedStore::load_dir(dir.path(), 16),
            Err(AnalysisError::EmptyDataset { .. })
        ));
        assert!(matches!(
            SeriesStore::load_dir(dir.path()),
            Err(AnalysisError::EmptyDataset { .. })
        ));
        assert!(matches!(
            TimingSet::load_dir(dir.path()),
            Err(AnalysisError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn test_load_dir_propagates_format_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.01.txt"), "0.0\n1 2\n").unwrap();
        let err = TimeAlignedStore::load_dir(dir.path(), 2).unwrap_err();
        assert!(err.to_string().contains("0.01.txt:1"));
    }

    fn assert_duplicate(err: AnalysisError, param: f64, first: &str, second: &str) {
        let AnalysisError::Format(err) = err else {
            panic!("expected a format error, got {err:?}");
        };
        assert!(err.source_name.ends_with(second), "{err}");
        let FormatErrorKind::DuplicateParam { param: p, first: f } = &err.kind else {
            panic!("expected a duplicate parameter, got {err}");
        };
        assert_eq!(*p, param);
        assert!(f.ends_with(first), "{f}");
    }

    #[test]
    fn test_load_dir_rejects_equal_params_spelled_differently() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.00001.txt"), "0.0\n1 2\n").unwrap();
        fs::write(dir.path().join("1e-05.txt"), "0.0\n3 4\n0.5\n3 4\n").unwrap();

        let err = TimeAlignedStore::load_dir(dir.path(), 1).unwrap_err();
        assert_duplicate(err, 0.00001, "0.00001.txt", "1e-05.txt");
    }

    #[test]
    fn test_timing_set_rejects_equal_positions() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.5.txt"), "1\n").unwrap();
        fs::write(dir.path().join("0.50.txt"), "2\n").unwrap();

        let err = TimingSet::load_dir(dir.path()).unwrap_err();
        assert_duplicate(err, 0.5, "0.5.txt", "0.50.txt");
    }

    #[test]
    fn test_series_store_rejects_equal_timesteps_in_method_dir() {
        let dir = tempdir().unwrap();
        let euler = dir.path().join("euler");
        fs::create_dir(&euler).unwrap();
        fs::write(euler.join("0.01.txt"), "0 1 1\n").unwrap();
        fs::write(euler.join("1e-2.txt"), "0 2 1\n").unwrap();

        let err = SeriesStore::load_dir(dir.path()).unwrap_err();
        assert_duplicate(err, 0.01, "0.01.txt", "1e-2.txt");
    }

    #[test]
    fn test_series_store_method_tree() {
        let dir = tempdir().unwrap();
        let euler = dir.path().join("euler");
        let verlet = dir.path().join("verlet");
        fs::create_dir(&euler).unwrap();
        fs::create_dir(&verlet).unwrap();
        fs::write(euler.join("0.01.txt"), "0 1 1\n").unwrap();
        fs::write(euler.join("0.001.txt"), "0 1 1\n").unwrap();
        fs::write(verlet.join("0.01.txt"), "0 1 1 0\n").unwrap();
        fs::write(dir.path().join("oscillator.txt"), "0 1 1 0\n").unwrap();

        let store = SeriesStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.methods(), vec!["euler", "oscillator", "verlet"]);
        assert_eq!(
            store.delta_ts("euler", SortOrder::Descending).unwrap(),
            vec![0.01, 0.001]
        );
        assert!(store.get("oscillator", None).is_ok());
        assert!(store.get("verlet", Some(0.01)).unwrap().error().is_some());
        assert!(matches!(
            store.get("verlet", Some(0.5)),
            Err(LookupError::UnknownSeries { .. })
        ));
        assert!(matches!(
            store.delta_ts("rk4", SortOrder::Ascending),
            Err(LookupError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_series_store_rejects_non_numeric_file_in_method_dir() {
        let dir = tempdir().unwrap();
        let euler = dir.path().join("euler");
        fs::create_dir(&euler).unwrap();
        fs::write(euler.join("latest.txt"), "0 1 1\n").unwrap();
        assert!(matches!(
            SeriesStore::load_dir(dir.path()),
            Err(AnalysisError::Format(_))
        ));
    }

    #[test]
    fn test_timing_set_entries_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("0.49.txt"), "10\n12\n").unwrap();
        fs::write(dir.path().join("0.42.txt"), "9\n").unwrap();
        let set = TimingSet::load_dir(dir.path()).unwrap();
        let entries = set.entries(SortOrder::Ascending);
        assert_eq!(entries[0], (0.42, &[9.0][..]));
        assert_eq!(entries[1], (0.49, &[10.0, 12.0][..]));
    }
}
