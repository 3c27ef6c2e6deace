//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::sync::Arc;

use cloudwait_provider::{
    ComputeProvider, ProviderCredentials, ProviderOptions, create_provider_with_options,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// EC2 provider pointed at a mock server, without retries.
pub fn ec2_against(endpoint: &str) -> Arc<dyn ComputeProvider> {
    let options = ProviderOptions {
        region: Some("us-east-1".to_string()),
        endpoint: Some(endpoint.to_string()),
        max_retries: Some(0),
    };
    create_provider_with_options(
        ProviderCredentials::Ec2 {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: None,
        },
        &options,
    )
    .expect("ec2 provider")
}

/// OpenStack provider whose Nova and Cinder endpoints both live on `base`.
pub fn openstack_against(base: &str) -> Arc<dyn ComputeProvider> {
    let options = ProviderOptions {
        max_retries: Some(0),
        ..ProviderOptions::default()
    };
    create_provider_with_options(
        ProviderCredentials::Openstack {
            auth_token: "test-token".to_string(),
            compute_endpoint: format!("{base}/compute/v2.1/project"),
            volume_endpoint: format!("{base}/volume/v3/project"),
        },
        &options,
    )
    .expect("openstack provider")
}

/// Wraps items in an EC2 response document.
pub fn ec2_document(root: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<{root} xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
    <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
    {body}
</{root}>"#
    )
}

/// EC2 error document.
pub fn ec2_error(code: &str, message: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response><Errors><Error><Code>{code}</Code><Message>{message}</Message></Error></Errors><RequestID>ea966190-f9aa-478e-9ede-example</RequestID></Response>"#
    )
}
