//! Policy documents attached to the function's execution role.

use stackwire_aws::{PolicyDocument, Statement};
use stackwire_core::Output;

/// Service allowed to assume the execution role.
pub(crate) const LAMBDA_SERVICE: &str = "lambda.amazonaws.com";

const LOG_ACTIONS: [&str; 5] = [
    "logs:CreateLogGroup",
    "logs:CreateLogStream",
    "logs:PutLogEvents",
    "logs:DescribeLogGroups",
    "logs:DescribeLogStreams",
];

/// Trust policy: only Lambda may assume the role.
pub(crate) fn assume_role() -> Output<String> {
    PolicyDocument::assume_role(LAMBDA_SERVICE).render()
}

/// Read access to every object of the bucket identified by `bucket_id`.
pub(crate) fn bucket_read(bucket_id: Output<String>) -> Output<String> {
    let objects = Output::concat([Output::known("arn:aws:s3:::"), bucket_id, Output::known("/*")]);
    PolicyDocument::new()
        .statement(Statement::allow(["s3:GetObject"]).resource(objects))
        .render()
}

pub(crate) fn table_write() -> Output<String> {
    PolicyDocument::new()
        .statement(Statement::allow(["dynamodb:PutItem"]).resource("*"))
        .render()
}

pub(crate) fn log_write() -> Output<String> {
    PolicyDocument::new()
        .statement(Statement::allow(LOG_ACTIONS).resource("*"))
        .render()
}
