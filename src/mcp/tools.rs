// MCP Tools implementation using official rmcp SDK

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
    tool, tool_router,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
};
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;

use crate::commands::{dashboard, project, settings, task};
use crate::storage::StorageState;

const INSTRUCTIONS: &str = "Taskdeck MCP Server - manage tasks and projects, read stats, analytics and calendar views, adjust settings";

/// Taskdeck MCP Server - provides tools for tasks, projects and dashboards
#[derive(Clone)]
pub struct TaskdeckServer {
    pub storage: StorageState,
    tool_router: ToolRouter<Self>,
}

impl TaskdeckServer {
    pub fn new(storage: StorageState) -> Self {
        Self {
            storage,
            tool_router: Self::tool_router(),
        }
    }
}

// Implement ServerHandler - delegates tool calls to the tool_router
impl rmcp::handler::server::ServerHandler for TaskdeckServer {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        let mut info = rmcp::model::ServerInfo::default();
        info.instructions = Some(INSTRUCTIONS.into());
        info
    }

    fn initialize(
        &self,
        _request: rmcp::model::InitializeRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::InitializeResult, McpError>> + Send + '_ {
        async move {
            tracing::info!("[MCP] Initialize called");
            let mut result = rmcp::model::InitializeResult::default();
            result.capabilities.tools = Some(rmcp::model::ToolsCapability {
                list_changed: Some(false),
            });
            result.server_info.name = "taskdeck".into();
            result.server_info.version = env!("CARGO_PKG_VERSION").into();
            result.instructions = Some(INSTRUCTIONS.into());
            Ok(result)
        }
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_ {
        async move {
            let tools = self.tool_router.list_all();
            tracing::debug!("[MCP] list_tools called, found {} tools", tools.len());
            Ok(rmcp::model::ListToolsResult {
                tools,
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        request: rmcp::model::CallToolRequestParam,
        context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            tracing::debug!("[MCP] call_tool: {}", request.name);
            let tool_context = rmcp::handler::server::tool::ToolCallContext::new(self, request, context);
            self.tool_router.call(tool_context).await
        }
    }
}

fn jsonResult<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn textResult(text: String) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

// ============================================
// Tool Input Types
// ============================================

#[derive(Deserialize, JsonSchema)]
pub struct IdInput {
    pub id: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct SearchInput {
    pub query: String,
}

#[derive(Deserialize, JsonSchema)]
pub struct TasksFilterInput {
    /// Case-insensitive match on title or description
    pub search: Option<String>,
    /// all, pending or completed
    pub view: Option<String>,
    /// low, medium or high
    pub priority: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
    pub tag: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct UpdateTaskInput {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    /// Empty string clears the due date
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Empty string or "none" unassigns the task
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct CreateProjectInput {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct AnalyticsInput {
    /// Length of the trailing trend window, defaults to the configured value
    pub days: Option<u32>,
}

#[derive(Deserialize, JsonSchema)]
pub struct CalendarInput {
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct UpdateSettingsInput {
    /// "global" (default) or "data" for the data-directory override
    pub scope: Option<String>,
    #[serde(rename = "defaultProjectColor")]
    pub default_project_color: Option<String>,
    #[serde(rename = "recentTasksLimit")]
    pub recent_tasks_limit: Option<usize>,
    #[serde(rename = "trendDays")]
    pub trend_days: Option<u32>,
}

// ============================================
// Tool Implementations
// ============================================

#[tool_router]
impl TaskdeckServer {
    // --- Tasks ---

    #[tool(description = "List tasks, optionally filtered by search text, view, priority, project or tag")]
    async fn list_tasks(&self, input: Parameters<TasksFilterInput>) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let tasks = task::getTasks(&self.storage, task::TasksFilterInput {
            search: input.search,
            view: input.view,
            priority: input.priority,
            projectId: input.project_id,
            tag: input.tag,
        }).map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&tasks)
    }

    #[tool(description = "Get a specific task by ID")]
    async fn get_task(&self, input: Parameters<IdInput>) -> Result<CallToolResult, McpError> {
        let found = task::getTaskById(&self.storage, &input.0.id)
            .ok_or_else(|| McpError::invalid_params(format!("Task not found: {}", input.0.id), None))?;
        jsonResult(&found)
    }

    #[tool(description = "Create a new task")]
    async fn create_task(&self, input: Parameters<CreateTaskInput>) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let created = task::createTask(&self.storage, task::CreateTaskInput {
            title: input.title,
            description: input.description,
            priority: input.priority,
            dueDate: input.due_date,
            tags: input.tags,
            projectId: input.project_id,
        }).map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&created)
    }

    #[tool(description = "Update an existing task; omitted fields are left unchanged")]
    async fn update_task(&self, input: Parameters<UpdateTaskInput>) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let updated = task::updateTask(&self.storage, task::UpdateTaskInput {
            id: input.id,
            title: input.title,
            description: input.description,
            completed: input.completed,
            priority: input.priority,
            dueDate: input.due_date,
            tags: input.tags,
            projectId: input.project_id,
        }).map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&updated)
    }

    #[tool(description = "Delete a task by ID")]
    async fn delete_task(&self, input: Parameters<IdInput>) -> Result<CallToolResult, McpError> {
        task::deleteTask(&self.storage, &input.0.id)
            .map_err(|e| McpError::invalid_params(e, None))?;
        textResult(format!("Task {} deleted successfully", input.0.id))
    }

    #[tool(description = "Toggle a task between completed and pending")]
    async fn toggle_task(&self, input: Parameters<IdInput>) -> Result<CallToolResult, McpError> {
        let toggled = task::toggleTask(&self.storage, &input.0.id)
            .map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&toggled)
    }

    #[tool(description = "Search tasks by title or description")]
    async fn search_tasks(&self, input: Parameters<SearchInput>) -> Result<CallToolResult, McpError> {
        jsonResult(&task::searchTasks(&self.storage, &input.0.query))
    }

    // --- Projects ---

    #[tool(description = "List all projects with their task counts")]
    async fn list_projects(&self) -> Result<CallToolResult, McpError> {
        jsonResult(&project::getProjects(&self.storage))
    }

    #[tool(description = "Create a new project")]
    async fn create_project(&self, input: Parameters<CreateProjectInput>) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let created = project::createProject(&self.storage, project::CreateProjectInput {
            name: input.name,
            color: input.color,
        }).map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&created)
    }

    #[tool(description = "Delete a project; its tasks keep their project reference")]
    async fn delete_project(&self, input: Parameters<IdInput>) -> Result<CallToolResult, McpError> {
        project::deleteProject(&self.storage, &input.0.id)
            .map_err(|e| McpError::invalid_params(e, None))?;
        textResult(format!("Project {} deleted successfully", input.0.id))
    }

    // --- Views ---

    #[tool(description = "Total, completed, pending and overdue task counts")]
    async fn get_stats(&self) -> Result<CallToolResult, McpError> {
        jsonResult(&dashboard::getTaskStats(&self.storage))
    }

    #[tool(description = "Stats, progress, most urgent tasks and this week's activity")]
    async fn get_dashboard(&self) -> Result<CallToolResult, McpError> {
        jsonResult(&dashboard::getDashboard(&self.storage))
    }

    #[tool(description = "Completion trend plus task counts by priority and project")]
    async fn get_analytics(&self, input: Parameters<AnalyticsInput>) -> Result<CallToolResult, McpError> {
        let analytics = dashboard::getAnalytics(&self.storage, input.0.days)
            .map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&analytics)
    }

    #[tool(description = "Due-date markers and the tasks due on a given day")]
    async fn get_calendar(&self, input: Parameters<CalendarInput>) -> Result<CallToolResult, McpError> {
        let calendar = dashboard::getCalendar(&self.storage, input.0.date.as_deref())
            .map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&calendar)
    }

    // --- Settings ---

    #[tool(description = "Effective settings after the data-directory override")]
    async fn get_settings(&self) -> Result<CallToolResult, McpError> {
        jsonResult(&settings::getSettings(&self.storage))
    }

    #[tool(description = "Update settings globally or for the current data directory")]
    async fn update_settings(&self, input: Parameters<UpdateSettingsInput>) -> Result<CallToolResult, McpError> {
        let input = input.0;
        let update = settings::UpdateSettingsInput {
            defaultProjectColor: input.default_project_color,
            recentTasksLimit: input.recent_tasks_limit,
            trendDays: input.trend_days,
        };
        match input.scope.as_deref().unwrap_or("global") {
            "global" => settings::updateGlobalSettings(&self.storage, update),
            "data" => settings::updateDataSettings(&self.storage, update),
            other => Err(format!("Invalid scope: {}", other)),
        }
        .map_err(|e| McpError::invalid_params(e, None))?;
        jsonResult(&settings::getSettings(&self.storage))
    }
}
