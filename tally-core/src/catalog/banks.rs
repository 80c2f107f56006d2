//! Curated question banks
//!
//! Five questions per platform, each tagged with a pillar and a manual
//! importance on the 1-10 scale. Point values are never authored here;
//! the weight distributor derives them so every assessment lands on an
//! exact 100-point rubric.
//!
//! Follow-ups are declared next to the base question they clarify, with
//! the classification set that triggers them.

use crate::oracle::Classification;

/// One curated base question, before ids and point values are assigned
pub(crate) struct BankEntry {
    pub text: &'static str,
    pub importance: f64,
    pub pillar: &'static str,
    pub follow_ups: &'static [FollowUpSpec],
}

/// A conditional follow-up declared on a bank entry
pub(crate) struct FollowUpSpec {
    pub text: &'static str,
    pub max_score: f64,
    pub triggers: &'static [Classification],
}

const TRIGGER_GAP: &[Classification] = &[Classification::Partial, Classification::No];

/// Display name for a pillar id
pub fn pillar_display_name(pillar_id: &str) -> &str {
    match pillar_id {
        "security" => "Security & Compliance",
        "governance" => "Governance & Access Control",
        "code_review" => "Code Review & Quality",
        "repository_management" => "Repository Management",
        "process_metrics" => "Process & Metrics",
        "cicd_security" => "CI/CD Security",
        "cicd_governance" => "CI/CD Governance",
        "cicd_quality" => "CI/CD Quality",
        "deployment_automation" => "Deployment Automation",
        "deployment_security" => "Deployment Security",
        "deployment_monitoring" => "Deployment Monitoring",
        "deployment_reliability" => "Deployment Reliability",
        other => other,
    }
}

// ==================== Repository banks ====================

pub(crate) const GITHUB: &[BankEntry] = &[
    BankEntry {
        text: "Is MFA (Multi-Factor Authentication) enabled for all organization members?",
        importance: 8.0,
        pillar: "governance",
        follow_ups: &[FollowUpSpec {
            text: "Is MFA at least enforced for organization owners and repository administrators?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are secrets prevented from being committed using GitHub secret scanning?",
        importance: 8.0,
        pillar: "security",
        follow_ups: &[FollowUpSpec {
            text: "Do you run any alternative secret detection, such as pre-commit hooks or a CI scanning step?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are security alerts (Dependabot, CodeQL) actively monitored and acted upon with defined SLAs?",
        importance: 8.0,
        pillar: "security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Is branch protection enforced (mandatory PRs, minimum reviewers, status checks)?",
        importance: 8.0,
        pillar: "code_review",
        follow_ups: &[FollowUpSpec {
            text: "Which branches are protected, and do they require both reviews and passing status checks?",
            max_score: 2.0,
            triggers: &[Classification::Partial],
        }],
    },
    BankEntry {
        text: "Are repository visibility policies (public/internal/private) clearly defined and enforced?",
        importance: 7.0,
        pillar: "governance",
        follow_ups: &[],
    },
];

pub(crate) const GITLAB: &[BankEntry] = &[
    BankEntry {
        text: "Is two-factor authentication (2FA) enabled for all group members?",
        importance: 8.0,
        pillar: "governance",
        follow_ups: &[FollowUpSpec {
            text: "Is 2FA at least enforced for group owners and maintainers?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are push rules configured to prevent secrets, large files, or invalid commits?",
        importance: 8.0,
        pillar: "security",
        follow_ups: &[FollowUpSpec {
            text: "Do you scan merge requests for committed secrets in the pipeline instead?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are security scanning results (SAST, DAST, dependency scanning) reviewed before code promotion?",
        importance: 8.0,
        pillar: "security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Is merge request approval rules enforced based on branch and code area?",
        importance: 8.0,
        pillar: "code_review",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are protected branches configured with restricted push and merge permissions?",
        importance: 8.0,
        pillar: "code_review",
        follow_ups: &[FollowUpSpec {
            text: "Which branches are protected, and who retains direct push access to them?",
            max_score: 2.0,
            triggers: &[Classification::Partial],
        }],
    },
];

pub(crate) const AZURE_DEVOPS: &[BankEntry] = &[
    BankEntry {
        text: "Is multi-factor authentication (MFA) enabled for all users?",
        importance: 8.0,
        pillar: "governance",
        follow_ups: &[FollowUpSpec {
            text: "Are Azure AD conditional access policies applied to administrators at least?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are service hooks or policies used to prevent secret leakage?",
        importance: 8.0,
        pillar: "security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Is credential scanning enabled to detect secrets in code?",
        importance: 8.0,
        pillar: "security",
        follow_ups: &[FollowUpSpec {
            text: "Do you run a standalone credential scanner over the repositories on a schedule?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are branch policies enforced (minimum reviewers, build validation, comment resolution)?",
        importance: 8.0,
        pillar: "code_review",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are repository permissions managed using Azure AD groups with proper RBAC?",
        importance: 7.0,
        pillar: "governance",
        follow_ups: &[],
    },
];

pub(crate) const BITBUCKET: &[BankEntry] = &[
    BankEntry {
        text: "Is two-step verification enabled for all workspace members?",
        importance: 8.0,
        pillar: "governance",
        follow_ups: &[FollowUpSpec {
            text: "Is two-step verification at least required for workspace administrators?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are merge checks configured to prevent secrets from being committed?",
        importance: 8.0,
        pillar: "security",
        follow_ups: &[FollowUpSpec {
            text: "Is there any other secret detection in place, such as pipeline scanning?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are branch restrictions enforced (mandatory PRs, minimum approvers)?",
        importance: 8.0,
        pillar: "code_review",
        follow_ups: &[],
    },
    BankEntry {
        text: "Is SAML/SSO authentication enforced for workspace access?",
        importance: 7.0,
        pillar: "governance",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are security vulnerabilities in dependencies tracked and remediated with SLAs?",
        importance: 7.0,
        pillar: "security",
        follow_ups: &[],
    },
];

// ==================== CI/CD banks ====================

pub(crate) const GITHUB_ACTIONS: &[BankEntry] = &[
    BankEntry {
        text: "Are GitHub Actions workflows triggered only from protected branches?",
        importance: 8.0,
        pillar: "cicd_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are workflow permissions set to least privilege (minimum required scopes)?",
        importance: 7.0,
        pillar: "cicd_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are secrets stored securely using GitHub Secrets or environment-specific secrets?",
        importance: 8.0,
        pillar: "cicd_security",
        follow_ups: &[FollowUpSpec {
            text: "Where do workflow credentials live today, and who can read them?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are third-party GitHub Actions pinned to specific commit SHAs instead of tags?",
        importance: 6.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are required status checks configured to block merges on failing workflows?",
        importance: 7.0,
        pillar: "cicd_quality",
        follow_ups: &[],
    },
];

pub(crate) const AZURE_PIPELINES: &[BankEntry] = &[
    BankEntry {
        text: "Are Azure Key Vault integrations used for secret management instead of pipeline variables?",
        importance: 8.0,
        pillar: "cicd_security",
        follow_ups: &[FollowUpSpec {
            text: "Are the pipeline variables holding secrets at least marked secret and access-restricted?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are pipeline permissions restricted using Azure AD groups and service connections?",
        importance: 7.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are deployment approvals and gates configured for production environments?",
        importance: 7.0,
        pillar: "cicd_quality",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are agent pools secured and isolated per environment (dev/staging/prod)?",
        importance: 6.0,
        pillar: "cicd_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are pipeline audit logs monitored for unauthorized changes or executions?",
        importance: 6.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
];

pub(crate) const GITLAB_CI: &[BankEntry] = &[
    BankEntry {
        text: "Are CI/CD variables marked as 'protected' and 'masked' to prevent exposure?",
        importance: 8.0,
        pillar: "cicd_security",
        follow_ups: &[FollowUpSpec {
            text: "Which pipeline variables hold credentials, and are they visible in job logs?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are runners properly tagged and restricted to specific projects or groups?",
        importance: 7.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are deployment jobs configured with manual approval for production environments?",
        importance: 7.0,
        pillar: "cicd_quality",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are security scanning jobs (SAST, DAST, dependency scanning) part of the CI pipeline?",
        importance: 7.0,
        pillar: "cicd_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are pipeline artifacts set with appropriate expiration policies?",
        importance: 5.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
];

pub(crate) const JENKINS: &[BankEntry] = &[
    BankEntry {
        text: "Are Jenkins credentials stored in credential managers (not hardcoded in pipelines)?",
        importance: 8.0,
        pillar: "cicd_security",
        follow_ups: &[FollowUpSpec {
            text: "Are any credentials still hardcoded in Jenkinsfiles or job configuration?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are agent nodes secured with proper authentication and authorization?",
        importance: 7.0,
        pillar: "cicd_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are pipeline approvals enabled before deploying to production?",
        importance: 7.0,
        pillar: "cicd_quality",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are Jenkins plugins regularly updated and security-scanned for vulnerabilities?",
        importance: 6.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are build artifacts stored securely with access controls and retention policies?",
        importance: 6.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
];

pub(crate) const CIRCLECI: &[BankEntry] = &[
    BankEntry {
        text: "Are environment variables configured as secrets in CircleCI project settings?",
        importance: 8.0,
        pillar: "cicd_security",
        follow_ups: &[FollowUpSpec {
            text: "Are credentials masked in build output, or do they appear in logs?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are restricted contexts used to limit access to sensitive credentials?",
        importance: 7.0,
        pillar: "cicd_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are approval jobs configured for production deployments?",
        importance: 7.0,
        pillar: "cicd_quality",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are orbs (third-party integrations) from trusted sources and regularly reviewed?",
        importance: 6.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are build artifacts stored with proper access controls and retention limits?",
        importance: 6.0,
        pillar: "cicd_governance",
        follow_ups: &[],
    },
];

// ==================== Deployment banks ====================

pub(crate) const AZURE_DEPLOYMENT: &[BankEntry] = &[
    BankEntry {
        text: "Are Azure resources deployed using Infrastructure as Code (Bicep, Terraform, ARM)?",
        importance: 7.0,
        pillar: "deployment_automation",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are Azure Key Vault and Managed Identities used for secrets management?",
        importance: 8.0,
        pillar: "deployment_security",
        follow_ups: &[FollowUpSpec {
            text: "How are application secrets delivered to running workloads today?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are Azure Monitor and Application Insights configured for logging and alerting?",
        importance: 7.0,
        pillar: "deployment_monitoring",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are Azure Policy and RBAC enforced to control resource access and compliance?",
        importance: 7.0,
        pillar: "deployment_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are disaster recovery and backup strategies implemented for critical resources?",
        importance: 6.0,
        pillar: "deployment_reliability",
        follow_ups: &[],
    },
];

pub(crate) const AWS_DEPLOYMENT: &[BankEntry] = &[
    BankEntry {
        text: "Are AWS resources deployed using Infrastructure as Code (CloudFormation, Terraform, CDK)?",
        importance: 7.0,
        pillar: "deployment_automation",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are AWS Secrets Manager and IAM roles used for secure credential management?",
        importance: 8.0,
        pillar: "deployment_security",
        follow_ups: &[FollowUpSpec {
            text: "Are any long-lived access keys embedded in application configuration?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are CloudWatch logs, metrics, and alarms configured for monitoring and alerting?",
        importance: 7.0,
        pillar: "deployment_monitoring",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are IAM policies enforced with least privilege and multi-factor authentication (MFA)?",
        importance: 7.0,
        pillar: "deployment_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are automated backups and disaster recovery plans configured for critical services?",
        importance: 6.0,
        pillar: "deployment_reliability",
        follow_ups: &[],
    },
];

pub(crate) const GCP_DEPLOYMENT: &[BankEntry] = &[
    BankEntry {
        text: "Are GCP resources deployed using Infrastructure as Code (Deployment Manager, Terraform)?",
        importance: 7.0,
        pillar: "deployment_automation",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are Secret Manager and Workload Identity used for secure credential management?",
        importance: 8.0,
        pillar: "deployment_security",
        follow_ups: &[FollowUpSpec {
            text: "Do workloads still authenticate with exported service account key files?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are Cloud Monitoring and Cloud Logging configured for observability?",
        importance: 7.0,
        pillar: "deployment_monitoring",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are IAM policies and Organization Policies enforced with least privilege access?",
        importance: 7.0,
        pillar: "deployment_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are disaster recovery strategies and automated backups configured for critical data?",
        importance: 6.0,
        pillar: "deployment_reliability",
        follow_ups: &[],
    },
];

pub(crate) const ON_PREMISE_DEPLOYMENT: &[BankEntry] = &[
    BankEntry {
        text: "Are infrastructure configurations managed as code (Ansible, Puppet, Chef, Terraform)?",
        importance: 7.0,
        pillar: "deployment_automation",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are secrets and credentials stored in secure vaults (HashiCorp Vault, CyberArk)?",
        importance: 8.0,
        pillar: "deployment_security",
        follow_ups: &[FollowUpSpec {
            text: "Where are production credentials stored today, and who can reach them?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are centralized logging and monitoring systems (ELK, Prometheus, Grafana) configured?",
        importance: 7.0,
        pillar: "deployment_monitoring",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are access controls and network segmentation enforced for production environments?",
        importance: 7.0,
        pillar: "deployment_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are regular backups and disaster recovery procedures tested and documented?",
        importance: 6.0,
        pillar: "deployment_reliability",
        follow_ups: &[],
    },
];

pub(crate) const KUBERNETES_DEPLOYMENT: &[BankEntry] = &[
    BankEntry {
        text: "Are Kubernetes manifests managed using GitOps practices (ArgoCD, FluxCD)?",
        importance: 7.0,
        pillar: "deployment_automation",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are secrets managed using external secret managers (Sealed Secrets, External Secrets Operator)?",
        importance: 8.0,
        pillar: "deployment_security",
        follow_ups: &[FollowUpSpec {
            text: "Are plain Kubernetes Secrets committed to the manifest repository?",
            max_score: 2.0,
            triggers: TRIGGER_GAP,
        }],
    },
    BankEntry {
        text: "Are monitoring and logging solutions (Prometheus, Grafana, Loki) deployed in the cluster?",
        importance: 7.0,
        pillar: "deployment_monitoring",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are RBAC policies and Network Policies enforced to restrict access and traffic?",
        importance: 7.0,
        pillar: "deployment_security",
        follow_ups: &[],
    },
    BankEntry {
        text: "Are Persistent Volume backups and cluster disaster recovery plans in place?",
        importance: 6.0,
        pillar: "deployment_reliability",
        follow_ups: &[],
    },
];
