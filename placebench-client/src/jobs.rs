//! Job-related API endpoints

use crate::OrchestratorClient;
use crate::error::Result;
use placebench_core::dto::job::{
    ApiJob, DeregisterJobResponse, JobListStub, RegisterJobRequest, RegisterJobResponse,
};

impl OrchestratorClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Register (create or update) a job
    ///
    /// # Example
    /// ```no_run
    /// # use placebench_client::OrchestratorClient;
    /// # use placebench_core::dto::job::ApiJob;
    /// # async fn example(job: ApiJob) -> anyhow::Result<()> {
    /// let client = OrchestratorClient::new("http://127.0.0.1:4646");
    /// let response = client.register_job(&job).await?;
    /// println!("evaluation {}", response.eval_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn register_job(&self, job: &ApiJob) -> Result<RegisterJobResponse> {
        let url = format!("{}/v1/jobs", self.base_url);
        let response = self
            .client
            .put(&url)
            .json(&RegisterJobRequest { job: job.clone() })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all registered jobs
    pub async fn list_jobs(&self) -> Result<Vec<JobListStub>> {
        let url = format!("{}/v1/jobs", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Deregister (stop) a job
    ///
    /// The id is percent-encoded as a single path segment, so ids created by
    /// other tools may contain `/`, `?` or spaces.
    pub async fn deregister_job(&self, job_id: &str) -> Result<DeregisterJobResponse> {
        let url = self.endpoint(&["v1", "job", job_id])?;
        let response = self.client.delete(url).send().await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use placebench_core::dto::job::ApiTaskGroup;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_job(id: &str) -> ApiJob {
        ApiJob {
            id: id.to_string(),
            name: "bench".to_string(),
            job_type: "service".to_string(),
            priority: 50,
            datacenters: vec!["dc1".to_string()],
            task_groups: vec![ApiTaskGroup {
                name: "cache".to_string(),
                count: 1,
                restart_policy: None,
                tasks: vec![],
            }],
        }
    }

    #[tokio::test]
    async fn test_register_job() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/jobs"))
            .and(body_partial_json(json!({"Job": {"ID": "job-0", "Name": "bench"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"EvalID": "eval-1", "JobModifyIndex": 12})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = OrchestratorClient::new(server.uri());
        let response = client.register_job(&api_job("job-0")).await.unwrap();

        assert_eq!(response.eval_id, "eval-1");
        assert_eq!(response.job_modify_index, 12);
    }

    #[tokio::test]
    async fn test_register_job_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1/jobs"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid job"))
            .mount(&server)
            .await;

        let client = OrchestratorClient::new(server.uri());
        let err = client.register_job(&api_job("job-0")).await.unwrap_err();

        match err {
            ClientError::ApiError { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid job");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_jobs() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"ID": "job-0", "Name": "bench", "Type": "service", "Status": "running"},
                {"ID": "job-1", "Name": "bench", "Type": "service", "Status": "pending"}
            ])))
            .mount(&server)
            .await;

        let client = OrchestratorClient::new(server.uri());
        let jobs = client.list_jobs().await.unwrap();

        let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["job-0", "job-1"]);
    }

    #[tokio::test]
    async fn test_deregister_job() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/job/job-4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"EvalID": "eval-9"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = OrchestratorClient::new(server.uri());
        let response = client.deregister_job("job-4").await.unwrap();
        assert_eq!(response.eval_id, "eval-9");
    }

    #[tokio::test]
    async fn test_deregister_unknown_job() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/job/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_string("job not found"))
            .mount(&server)
            .await;

        let client = OrchestratorClient::new(server.uri());
        let err = client.deregister_job("ghost").await.unwrap_err();
        assert!(matches!(err, ClientError::ApiError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_deregister_job_escapes_id() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1/job/team%2Fcache%20job%3Fv=2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"EvalID": "eval-3"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = OrchestratorClient::new(server.uri());
        let response = client.deregister_job("team/cache job?v=2").await.unwrap();
        assert_eq!(response.eval_id, "eval-3");
    }

    #[tokio::test]
    async fn test_deregister_job_rejects_unusable_base_url() {
        let client = OrchestratorClient::new("not a url");
        let err = client.deregister_job("job-0").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
