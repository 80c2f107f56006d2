//! Platform selector enums
//!
//! The three axes an assessment is configured on: where code lives, what
//! runs the pipelines, and where workloads deploy. Parsed from the string
//! identifiers callers send; unknown identifiers are reported before any
//! session is created.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

use super::banks;
use super::banks::BankEntry;

/// Supported repository tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryTool {
    Github,
    Gitlab,
    AzureDevops,
    Bitbucket,
}

impl RepositoryTool {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryTool::Github => "github",
            RepositoryTool::Gitlab => "gitlab",
            RepositoryTool::AzureDevops => "azure_devops",
            RepositoryTool::Bitbucket => "bitbucket",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s {
            "github" => Ok(RepositoryTool::Github),
            "gitlab" => Ok(RepositoryTool::Gitlab),
            "azure_devops" => Ok(RepositoryTool::AzureDevops),
            "bitbucket" => Ok(RepositoryTool::Bitbucket),
            _ => Err(CatalogError::UnknownTool(s.to_string())),
        }
    }

    pub(crate) fn bank(&self) -> &'static [BankEntry] {
        match self {
            RepositoryTool::Github => banks::GITHUB,
            RepositoryTool::Gitlab => banks::GITLAB,
            RepositoryTool::AzureDevops => banks::AZURE_DEVOPS,
            RepositoryTool::Bitbucket => banks::BITBUCKET,
        }
    }
}

impl fmt::Display for RepositoryTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported CI/CD platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CicdPlatform {
    GithubActions,
    AzurePipelines,
    GitlabCi,
    Jenkins,
    Circleci,
}

impl CicdPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            CicdPlatform::GithubActions => "github_actions",
            CicdPlatform::AzurePipelines => "azure_pipelines",
            CicdPlatform::GitlabCi => "gitlab_ci",
            CicdPlatform::Jenkins => "jenkins",
            CicdPlatform::Circleci => "circleci",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s {
            "github_actions" => Ok(CicdPlatform::GithubActions),
            "azure_pipelines" => Ok(CicdPlatform::AzurePipelines),
            "gitlab_ci" => Ok(CicdPlatform::GitlabCi),
            "jenkins" => Ok(CicdPlatform::Jenkins),
            "circleci" => Ok(CicdPlatform::Circleci),
            _ => Err(CatalogError::UnknownCicdPlatform(s.to_string())),
        }
    }

    pub(crate) fn bank(&self) -> &'static [BankEntry] {
        match self {
            CicdPlatform::GithubActions => banks::GITHUB_ACTIONS,
            CicdPlatform::AzurePipelines => banks::AZURE_PIPELINES,
            CicdPlatform::GitlabCi => banks::GITLAB_CI,
            CicdPlatform::Jenkins => banks::JENKINS,
            CicdPlatform::Circleci => banks::CIRCLECI,
        }
    }
}

impl fmt::Display for CicdPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported deployment platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentPlatform {
    Azure,
    Aws,
    Gcp,
    OnPremise,
    Kubernetes,
}

impl DeploymentPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentPlatform::Azure => "azure",
            DeploymentPlatform::Aws => "aws",
            DeploymentPlatform::Gcp => "gcp",
            DeploymentPlatform::OnPremise => "on_premise",
            DeploymentPlatform::Kubernetes => "kubernetes",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s {
            "azure" => Ok(DeploymentPlatform::Azure),
            "aws" => Ok(DeploymentPlatform::Aws),
            "gcp" => Ok(DeploymentPlatform::Gcp),
            "on_premise" => Ok(DeploymentPlatform::OnPremise),
            "kubernetes" => Ok(DeploymentPlatform::Kubernetes),
            _ => Err(CatalogError::UnknownDeploymentPlatform(s.to_string())),
        }
    }

    pub(crate) fn bank(&self) -> &'static [BankEntry] {
        match self {
            DeploymentPlatform::Azure => banks::AZURE_DEPLOYMENT,
            DeploymentPlatform::Aws => banks::AWS_DEPLOYMENT,
            DeploymentPlatform::Gcp => banks::GCP_DEPLOYMENT,
            DeploymentPlatform::OnPremise => banks::ON_PREMISE_DEPLOYMENT,
            DeploymentPlatform::Kubernetes => banks::KUBERNETES_DEPLOYMENT,
        }
    }
}

impl fmt::Display for DeploymentPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
