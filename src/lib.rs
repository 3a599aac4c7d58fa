pub mod alignment;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ontology;
pub mod scorer;
pub mod store;
pub mod suggestions;
pub mod text;
pub mod vector;

pub use alignment::analyze_alignment;
pub use config::{ScorerConfig, SuggestionConfig, PASS_THRESHOLD};
pub use error::{CoreError, Result};
pub use models::{SdResult, SdStatus, Suggestion};
pub use scorer::{calculate_sd, SdScorer};
pub use suggestions::{generate_suggestions, SuggestionEngine};

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;
    use pyo3::types::{PyDict, PyList};

    use crate::alignment::AlignmentAnalyzer;
    use crate::config::{ScorerConfig, SuggestionConfig};
    use crate::error::CoreError;
    use crate::models::{PromptAgent, SdResult, Suggestion};
    use crate::scorer::SdScorer;
    use crate::store::AgentStore;
    use crate::suggestions::SuggestionEngine;

    fn to_py_err(e: CoreError) -> PyErr {
        match e {
            CoreError::AgentNotFound(id) => PyErr::new::<pyo3::exceptions::PyKeyError, _>(id),
            CoreError::InvalidAgent(_) | CoreError::Config(_) | CoreError::Serialization(_) => {
                PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
            }
            other => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(other.to_string()),
        }
    }

    fn result_to_dict<'py>(py: Python<'py>, result: &SdResult) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("score", result.score)?;
        dict.set_item("status", result.status.as_str())?;
        dict.set_item("message", &result.message)?;
        dict.set_item("passes", result.passes())?;
        Ok(dict)
    }

    fn suggestion_to_dict<'py>(py: Python<'py>, s: &Suggestion) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("name", &s.name)?;
        dict.set_item("sd", s.sd)?;
        dict.set_item("improvement", s.improvement)?;
        Ok(dict)
    }

    /// Python-facing scorer. Optional JSON config overrides the defaults.
    #[pyclass(name = "SdScorer")]
    struct PySdScorer {
        engine: SuggestionEngine,
    }

    #[pymethods]
    impl PySdScorer {
        #[new]
        #[pyo3(signature = (config_json=None))]
        fn new(config_json: Option<&str>) -> PyResult<Self> {
            let scorer = match config_json {
                Some(json) => SdScorer::with_config(ScorerConfig::from_json(json).map_err(to_py_err)?),
                None => SdScorer::new(),
            };
            Ok(PySdScorer {
                engine: SuggestionEngine::with_parts(scorer, SuggestionConfig::default()),
            })
        }

        fn calculate(&self, py: Python, name: &str, domain: &str) -> PyResult<Py<PyAny>> {
            let result = self.engine.scorer().calculate(name, domain);
            Ok(result_to_dict(py, &result)?.into())
        }

        #[pyo3(signature = (name, domain, current_sd, max_suggestions=3))]
        fn suggest(
            &self,
            py: Python,
            name: &str,
            domain: &str,
            current_sd: f64,
            max_suggestions: usize,
        ) -> PyResult<Py<PyAny>> {
            let list = PyList::empty(py);
            for s in self.engine.generate(name, domain, current_sd, max_suggestions) {
                list.append(suggestion_to_dict(py, &s)?)?;
            }
            Ok(list.into())
        }

        /// Alignment report as a JSON string.
        fn analyze(&self, name: &str, domain: &str) -> PyResult<String> {
            let report =
                AlignmentAnalyzer::with_scorer(self.engine.scorer().clone()).analyze(name, domain);
            serde_json::to_string(&report).map_err(|e| to_py_err(e.into()))
        }
    }

    /// Python-facing agent store. Agents cross the boundary as JSON.
    #[pyclass(name = "AgentStore", unsendable)]
    struct PyAgentStore {
        inner: AgentStore,
    }

    #[pymethods]
    impl PyAgentStore {
        #[new]
        #[pyo3(signature = (path=None))]
        fn new(path: Option<&str>) -> PyResult<Self> {
            let inner = match path {
                Some(p) => AgentStore::persistent(p),
                None => AgentStore::in_memory(),
            };
            inner
                .map(|s| PyAgentStore { inner: s })
                .map_err(to_py_err)
        }

        /// Save an agent given as JSON. Returns the stored SD score.
        fn save(&self, agent_json: &str) -> PyResult<f64> {
            let agent: PromptAgent =
                serde_json::from_str(agent_json).map_err(|e| to_py_err(e.into()))?;
            self.inner.save(&agent).map_err(to_py_err)
        }

        /// Create and save a bare agent from name and domain. Returns its id.
        fn create(&self, name: &str, domain: &str) -> PyResult<String> {
            let agent = PromptAgent::new(name, domain);
            self.inner.save(&agent).map_err(to_py_err)?;
            Ok(agent.id)
        }

        fn get(&self, id: &str) -> PyResult<String> {
            let agent = self.inner.get(id).map_err(to_py_err)?;
            serde_json::to_string(&agent).map_err(|e| to_py_err(e.into()))
        }

        #[pyo3(signature = (min_sd=None))]
        fn list(&self, min_sd: Option<f64>) -> PyResult<Vec<String>> {
            let agents = self.inner.list(min_sd).map_err(to_py_err)?;
            agents
                .iter()
                .map(|a| serde_json::to_string(a).map_err(|e| to_py_err(e.into())))
                .collect()
        }

        fn delete(&self, id: &str) -> PyResult<bool> {
            self.inner.delete(id).map_err(to_py_err)
        }

        fn count(&self) -> PyResult<usize> {
            self.inner.count().map_err(to_py_err)
        }

        fn summary(&self, py: Python) -> PyResult<Py<PyAny>> {
            let s = self.inner.summary().map_err(to_py_err)?;
            let dict = PyDict::new(py);
            dict.set_item("total_agents", s.total_agents)?;
            dict.set_item("passing_agents", s.passing_agents)?;
            dict.set_item("average_sd", s.average_sd)?;
            dict.set_item("newest", s.newest.map(|dt| dt.to_rfc3339()))?;
            Ok(dict.into())
        }
    }

    #[pyfunction]
    fn calculate_sd(py: Python, name: &str, domain: &str) -> PyResult<Py<PyAny>> {
        let result = crate::scorer::calculate_sd(name, domain);
        Ok(result_to_dict(py, &result)?.into())
    }

    #[pyfunction]
    #[pyo3(signature = (name, domain, current_sd, max_suggestions=3))]
    fn generate_suggestions(
        py: Python,
        name: &str,
        domain: &str,
        current_sd: f64,
        max_suggestions: usize,
    ) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for s in crate::suggestions::generate_suggestions(name, domain, current_sd, max_suggestions)
        {
            list.append(suggestion_to_dict(py, &s)?)?;
        }
        Ok(list.into())
    }

    /// Same JSON document as the remote analysis endpoint.
    #[pyfunction]
    fn analyze_alignment(name: &str, domain: &str) -> PyResult<String> {
        let report = crate::alignment::analyze_alignment(name, domain);
        serde_json::to_string(&report).map_err(|e| to_py_err(e.into()))
    }

    #[pyfunction]
    #[pyo3(signature = (filter=None))]
    fn init_logging(filter: Option<&str>) -> PyResult<()> {
        crate::logging::init_logging(filter).map_err(to_py_err)
    }

    /// Python module definition
    #[pymodule]
    fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PySdScorer>()?;
        m.add_class::<PyAgentStore>()?;
        m.add_function(wrap_pyfunction!(calculate_sd, m)?)?;
        m.add_function(wrap_pyfunction!(generate_suggestions, m)?)?;
        m.add_function(wrap_pyfunction!(analyze_alignment, m)?)?;
        m.add_function(wrap_pyfunction!(init_logging, m)?)?;
        Ok(())
    }
}
