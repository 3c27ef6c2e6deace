//! EC2 Provider 测试
//!
//! Mock 测试直接运行；真实 API 测试需要凭证:
//! ```bash
//! AWS_ACCESS_KEY_ID=xxx AWS_SECRET_ACCESS_KEY=xxx \
//!     cargo test -p cloudwait-provider --test ec2_test -- --ignored --nocapture
//! ```

mod common;

use cloudwait_provider::{
    AttachmentStatus, InstanceState, ProviderCredentials, ProviderError, ResourceHandle,
    ResourceKind, SnapshotStatus, VolumeStatus, create_provider,
};
use common::{ec2_against, ec2_document, ec2_error};
use mockito::Matcher;

fn action(name: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("Action".into(), name.into()),
        Matcher::UrlEncoded("Version".into(), "2016-11-15".into()),
    ])
}

const RUNNING_INSTANCE: &str = r"
<reservationSet>
    <item>
        <reservationId>r-1</reservationId>
        <instancesSet>
            <item>
                <instanceId>i-1234567890abcdef0</instanceId>
                <imageId>ami-0abcdef1234567890</imageId>
                <instanceState><code>16</code><name>running</name></instanceState>
                <launchTime>2024-03-01T10:00:00.000Z</launchTime>
                <placement><availabilityZone>us-east-1a</availabilityZone></placement>
                <tagSet><item><key>Name</key><value>web-1</value></item></tagSet>
            </item>
        </instancesSet>
    </item>
</reservationSet>";

// ============ Instances ============

#[tokio::test]
async fn get_instance_parses_state() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            action("DescribeInstances"),
            Matcher::UrlEncoded("InstanceId.1".into(), "i-1234567890abcdef0".into()),
        ]))
        .match_header(
            "authorization",
            Matcher::Regex(
                r"^AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/\d{8}/us-east-1/ec2/aws4_request, SignedHeaders=host;x-amz-date, Signature=[0-9a-f]{64}$".into(),
            ),
        )
        .match_header("x-amz-date", Matcher::Regex(r"^\d{8}T\d{6}Z$".into()))
        .with_status(200)
        .with_body(ec2_document("DescribeInstancesResponse", RUNNING_INSTANCE))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let instance = require_ok!(
        provider
            .get_instance(&ResourceHandle::new("i-1234567890abcdef0"))
            .await
    );

    assert_eq!(instance.state, InstanceState::Running);
    assert_eq!(instance.raw_state, "running");
    assert_eq!(instance.name.as_deref(), Some("web-1"));
    assert_eq!(instance.image_id.as_deref(), Some("ami-0abcdef1234567890"));
    assert_eq!(instance.region.as_deref(), Some("us-east-1"));
    assert!(instance.launched_at.is_some());
    mock.assert_async().await;
}

#[tokio::test]
async fn handle_region_used_for_signing() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(action("DescribeInstances"))
        .match_header(
            "authorization",
            Matcher::Regex(r"/eu-west-1/ec2/aws4_request".into()),
        )
        .with_status(200)
        .with_body(ec2_document("DescribeInstancesResponse", RUNNING_INSTANCE))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let instance = require_ok!(
        provider
            .get_instance(&ResourceHandle::in_region("eu-west-1", "i-1234567890abcdef0"))
            .await
    );
    assert_eq!(instance.region.as_deref(), Some("eu-west-1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_instance_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(action("DescribeInstances"))
        .with_status(400)
        .with_body(ec2_error(
            "InvalidInstanceID.NotFound",
            "The instance ID 'i-0000' does not exist",
        ))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let err = provider
        .get_instance(&ResourceHandle::new("i-0000"))
        .await
        .unwrap_err();

    assert!(
        matches!(
            &err,
            ProviderError::ResourceNotFound { kind: ResourceKind::Instance, resource_id, .. }
                if resource_id == "i-0000"
        ),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn empty_reservation_set_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(action("DescribeInstances"))
        .with_status(200)
        .with_body(ec2_document(
            "DescribeInstancesResponse",
            "<reservationSet/>",
        ))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let err = provider
        .get_instance(&ResourceHandle::new("i-gone"))
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[tokio::test]
async fn auth_failure_is_invalid_credentials() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(ec2_error("AuthFailure", "AWS was not able to validate the provided access credentials"))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let err = provider
        .get_instance(&ResourceHandle::new("i-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidCredentials { .. }));

    let valid = require_ok!(provider.validate_credentials().await);
    assert!(!valid);
}

#[tokio::test]
async fn server_error_is_network_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let err = provider
        .get_volume(&ResourceHandle::new("vol-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NetworkError { .. }));
    assert!(!err.is_not_found());
}

// ============ Volumes ============

#[tokio::test]
async fn get_volume_with_attachments() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            action("DescribeVolumes"),
            Matcher::UrlEncoded("VolumeId.1".into(), "vol-049df61146c4d7901".into()),
        ]))
        .with_status(200)
        .with_body(ec2_document(
            "DescribeVolumesResponse",
            r"<volumeSet>
                <item>
                    <volumeId>vol-049df61146c4d7901</volumeId>
                    <size>8</size>
                    <availabilityZone>us-east-1a</availabilityZone>
                    <status>in-use</status>
                    <createTime>2024-03-01T10:00:00.000Z</createTime>
                    <attachmentSet>
                        <item>
                            <volumeId>vol-049df61146c4d7901</volumeId>
                            <instanceId>i-old</instanceId>
                            <device>/dev/sdf</device>
                            <status>detached</status>
                            <attachTime>2024-03-01T10:05:00.000Z</attachTime>
                        </item>
                        <item>
                            <volumeId>vol-049df61146c4d7901</volumeId>
                            <instanceId>i-new</instanceId>
                            <device>/dev/sdg</device>
                            <status>attached</status>
                            <attachTime>2024-03-02T10:05:00.000Z</attachTime>
                        </item>
                    </attachmentSet>
                </item>
            </volumeSet>",
        ))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let volume = require_ok!(
        provider
            .get_volume(&ResourceHandle::new("vol-049df61146c4d7901"))
            .await
    );

    assert_eq!(volume.status, VolumeStatus::InUse);
    assert_eq!(volume.size_gb, 8);
    assert_eq!(volume.attachments.len(), 2);
    let latest = volume.latest_attachment().map(|a| a.instance_id.as_str());
    assert_eq!(latest, Some("i-new"));

    let attachment = require_ok!(
        provider
            .get_attachment(&ResourceHandle::new("vol-049df61146c4d7901"), "i-new")
            .await
    );
    assert_eq!(attachment.status, AttachmentStatus::Attached);
    assert_eq!(attachment.device.as_deref(), Some("/dev/sdg"));
}

#[tokio::test]
async fn attachment_to_other_instance_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(action("DescribeVolumes"))
        .with_status(200)
        .with_body(ec2_document(
            "DescribeVolumesResponse",
            r"<volumeSet>
                <item>
                    <volumeId>vol-1</volumeId>
                    <size>8</size>
                    <status>available</status>
                    <attachmentSet/>
                </item>
            </volumeSet>",
        ))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let err = provider
        .get_attachment(&ResourceHandle::new("vol-1"), "i-1")
        .await
        .unwrap_err();
    assert!(
        matches!(
            &err,
            ProviderError::ResourceNotFound { kind: ResourceKind::Attachment, resource_id, .. }
                if resource_id == "vol-1:i-1"
        ),
        "unexpected error: {err:?}"
    );
}

// ============ Snapshots ============

#[tokio::test]
async fn get_snapshot_progress() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            action("DescribeSnapshots"),
            Matcher::UrlEncoded("SnapshotId.1".into(), "snap-1234567890abcdef0".into()),
        ]))
        .with_status(200)
        .with_body(ec2_document(
            "DescribeSnapshotsResponse",
            r"<snapshotSet>
                <item>
                    <snapshotId>snap-1234567890abcdef0</snapshotId>
                    <volumeId>vol-049df61146c4d7901</volumeId>
                    <status>pending</status>
                    <startTime>2024-03-01T10:00:00.000Z</startTime>
                    <progress>80%</progress>
                </item>
            </snapshotSet>",
        ))
        .create_async()
        .await;

    let provider = ec2_against(&server.url());
    let snapshot = require_ok!(
        provider
            .get_snapshot(&ResourceHandle::new("snap-1234567890abcdef0"))
            .await
    );
    assert_eq!(snapshot.status, SnapshotStatus::Pending);
    assert_eq!(snapshot.progress.as_deref(), Some("80%"));
    assert_eq!(snapshot.volume_id.as_deref(), Some("vol-049df61146c4d7901"));
}

// ============ 真实 API ============

#[tokio::test]
#[ignore = "integration test: requires AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY"]
async fn test_ec2_validate_credentials() {
    skip_if_no_credentials!("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY");

    let provider = create_provider(ProviderCredentials::Ec2 {
        access_key_id: std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
        secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
        session_token: std::env::var("AWS_SESSION_TOKEN").ok(),
    })
    .expect("创建 provider 失败");
    let valid = require_ok!(
        provider.validate_credentials().await,
        "validate_credentials 调用失败"
    );
    assert!(valid, "凭证应该有效");
}
