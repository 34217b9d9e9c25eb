use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use crate::config::SnapshotConfig;
use crate::errors::AppError;
use crate::models::project::ProjectRow;
use crate::models::stage::StageApprovalRow;
use crate::stages::stage::Stage;

/// Uploads markdown renders of a project's approved drafts to S3 / MinIO.
#[derive(Clone)]
pub struct SnapshotStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl SnapshotStore {
    /// Builds a client for MinIO (custom endpoint, path-style) or AWS.
    pub async fn connect(config: &SnapshotConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "manthan-static",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    /// Renders the project and writes it to `projects/<id>/<stage>.md`. Returns the key.
    pub async fn write_snapshot(
        &self,
        project: &ProjectRow,
        stage: Stage,
        approvals: &[StageApprovalRow],
    ) -> Result<String, AppError> {
        let key = snapshot_key(project, stage);
        let body = render_project_to_md(project, approvals);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body.into_bytes()))
            .content_type("text/markdown")
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded draft snapshot to s3://{}/{}", self.bucket, key);
        Ok(key)
    }
}

pub fn snapshot_key(project: &ProjectRow, stage: Stage) -> String {
    format!("projects/{}/{}.md", project.id, stage)
}

/// Renders the project header and each approved stage as a markdown document.
pub fn render_project_to_md(project: &ProjectRow, approvals: &[StageApprovalRow]) -> String {
    let mut md = format!("# {}\n\n", project.title);
    md.push_str(&format!("- **Logline:** {}\n", project.logline));
    if let Some(genre) = &project.genre {
        md.push_str(&format!("- **Genre:** {genre}\n"));
    }
    if let Some(tone) = &project.tone {
        md.push_str(&format!("- **Tone:** {tone}\n"));
    }
    if let Some(creator) = &project.creator_name {
        md.push_str(&format!("- **Creator:** {creator}\n"));
    }
    md.push_str(&format!("- **Stage:** {}\n\n", project.stage));

    for stage in Stage::ALL {
        let Some(approval) = approvals.iter().find(|a| a.stage == stage.as_str()) else {
            continue;
        };
        md.push_str(&format!("## {}\n\n", stage.heading()));
        md.push_str(&format!(
            "_Candidate {}{}, approved {}_\n\n",
            approval.candidate_id,
            if approval.edited { " (edited)" } else { "" },
            approval.created_at.format("%Y-%m-%d %H:%M UTC")
        ));
        md.push_str(approval.approved_text.trim());
        md.push_str("\n\n");
    }
    md
}
